//! SQL for the documents table. Filters on scalar values are pushed into
//! SQLite via `json_extract`; every row is re-checked against the full query.

use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection};
use serde_json::Value;

use chains_core::constants::DOCUMENT_ID_FIELD;
use chains_core::errors::{ChainsResult, StoreError};
use chains_core::traits::{document_id, DocumentQuery};

use super::map_sqlite_err;

/// Compiled WHERE clause plus its bound parameters.
struct Selection {
    clause: String,
    params: Vec<SqlValue>,
}

fn compile(collection: &str, query: &DocumentQuery) -> ChainsResult<Selection> {
    let mut clause = String::from("collection = ?1");
    let mut params = vec![SqlValue::Text(collection.to_string())];

    for (path, value) in query.filters() {
        if path == DOCUMENT_ID_FIELD {
            if let Some(id) = value.as_str() {
                params.push(SqlValue::Text(id.to_string()));
                clause.push_str(&format!(" AND id = ?{}", params.len()));
            }
            continue;
        }
        let column = json_column(path)?;
        match value {
            Value::Null => clause.push_str(&format!(" AND {column} IS NULL")),
            Value::String(s) => {
                params.push(SqlValue::Text(s.clone()));
                clause.push_str(&format!(" AND {column} = ?{}", params.len()));
            }
            Value::Bool(b) => {
                params.push(SqlValue::Integer(i64::from(*b)));
                clause.push_str(&format!(" AND {column} = ?{}", params.len()));
            }
            Value::Number(n) => {
                let bound = match n.as_i64() {
                    Some(i) => SqlValue::Integer(i),
                    None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
                };
                params.push(bound);
                clause.push_str(&format!(" AND {column} = ?{}", params.len()));
            }
            // Arrays and objects are matched by the in-memory re-check only.
            Value::Array(_) | Value::Object(_) => {}
        }
    }

    Ok(Selection { clause, params })
}

/// `json_extract(body, '$.a.b')` for a validated dotted path.
fn json_column(path: &str) -> ChainsResult<String> {
    let valid = !path.is_empty()
        && path.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if !valid {
        return Err(StoreError::Backend {
            message: format!("invalid field path '{path}'"),
        }
        .into());
    }
    Ok(format!("json_extract(body, '$.{path}')"))
}

fn parse_body(collection: &str, body: &str) -> ChainsResult<Value> {
    serde_json::from_str(body).map_err(|e| {
        StoreError::MalformedDocument {
            collection: collection.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// All matching documents, in insertion order.
pub fn select(
    conn: &Connection,
    collection: &str,
    query: &DocumentQuery,
    limit: Option<usize>,
) -> ChainsResult<Vec<Value>> {
    let selection = compile(collection, query)?;
    let sql = format!(
        "SELECT body FROM documents WHERE {} ORDER BY seq",
        selection.clause
    );
    let mut stmt = conn.prepare(&sql).map_err(map_sqlite_err)?;
    let bodies = stmt
        .query_map(params_from_iter(selection.params.iter()), |row| {
            row.get::<_, String>(0)
        })
        .map_err(map_sqlite_err)?;

    let mut documents = Vec::new();
    for body in bodies {
        let document = parse_body(collection, &body.map_err(map_sqlite_err)?)?;
        if query.matches(&document) {
            documents.push(document);
            if limit.is_some_and(|l| documents.len() >= l) {
                break;
            }
        }
    }
    Ok(documents)
}

/// Insert or replace a document, keeping its original `seq`.
pub fn upsert(conn: &Connection, collection: &str, document: &Value) -> ChainsResult<()> {
    let id = document_id(document).ok_or_else(|| StoreError::MalformedDocument {
        collection: collection.to_string(),
        reason: "document has no string '_id'".to_string(),
    })?;
    let body = serde_json::to_string(document).map_err(|e| StoreError::Serialization {
        collection: collection.to_string(),
        message: e.to_string(),
    })?;
    conn.execute(
        "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)
         ON CONFLICT (collection, id) DO UPDATE SET
            body = excluded.body,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        params![collection, id, body],
    )
    .map_err(map_sqlite_err)?;
    Ok(())
}

/// Delete matching documents inside one transaction.
pub fn delete(conn: &Connection, collection: &str, query: &DocumentQuery) -> ChainsResult<usize> {
    let doomed: Vec<String> = select(conn, collection, query, None)?
        .iter()
        .filter_map(|doc| document_id(doc).map(str::to_string))
        .collect();
    if doomed.is_empty() {
        return Ok(0);
    }

    let tx = conn.unchecked_transaction().map_err(map_sqlite_err)?;
    for id in &doomed {
        tx.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
        )
        .map_err(map_sqlite_err)?;
    }
    tx.commit().map_err(map_sqlite_err)?;
    Ok(doomed.len())
}
