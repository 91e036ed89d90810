//! `redb` backend type aliases.

//---------------------------------------------------------------------------------------------------- Types
/// The single table holding all records.
///
/// The composite record key (see [`super::encoding`]) carries the user
/// key, the user value, and a sequence number; the value column is unit.
pub(super) const RECORDS: redb::TableDefinition<'static, &'static [u8], ()> =
    redb::TableDefinition::new("records");

/// Read-only view of the records table.
pub(super) type RecordsTableRo = redb::ReadOnlyTable<&'static [u8], ()>;

/// Range iterator over the records table.
pub(super) type RecordsRange = redb::Range<'static, &'static [u8], ()>;
