//! v002: expression index for chain-id lookups and venue name queries.

pub const MIGRATION_SQL: &str = "
CREATE INDEX IF NOT EXISTS idx_documents_chain_id
    ON documents(collection, json_extract(body, '$.chain_id'));
CREATE INDEX IF NOT EXISTS idx_documents_name
    ON documents(collection, json_extract(body, '$.name'));
";
