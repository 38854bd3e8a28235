use crate::ExecLog;

use odoo_orm::{async_trait, Json, RawRecord, Result, Transport};
use serde_json::json;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// An in-memory server that logs every operation.
///
/// Clones share state, so a test keeps one handle while the client owns
/// another.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    state: Arc<Mutex<State>>,

    /// Log of all operations executed through this transport
    ops_log: Arc<Mutex<Vec<TransportOp>>>,
}

#[derive(Debug)]
struct State {
    version: String,
    next_id: i64,

    /// Rows per remote model, keyed by id
    tables: HashMap<String, BTreeMap<i64, RawRecord>>,

    /// Canned `search` results, used before evaluating the domain
    scripted_searches: VecDeque<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportOp {
    Read {
        model: String,
        ids: Vec<i64>,
        fields: Option<Vec<String>>,
    },
    Search {
        model: String,
        domain: Json,
        order: Option<String>,
    },
    Create {
        model: String,
        payload: Json,
    },
    Write {
        model: String,
        ids: Vec<i64>,
        payload: Json,
    },
    Unlink {
        model: String,
        ids: Vec<i64>,
    },
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                version: "17.0".to_string(),
                next_id: 1000,
                tables: HashMap::new(),
                scripted_searches: VecDeque::new(),
            })),
            ops_log: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn set_server_version(&self, version: &str) {
        self.state.lock().unwrap().version = version.to_string();
    }

    /// Stores a row. `row` must be an object with an integer `id`.
    pub fn insert(&self, model: &str, row: Json) {
        let Json::Object(row) = row else {
            panic!("row must be an object: {row}");
        };
        let id = row["id"].as_i64().expect("row without an integer id");

        self.state
            .lock()
            .unwrap()
            .tables
            .entry(model.to_string())
            .or_default()
            .insert(id, row);
    }

    /// Deletes a row behind the client's back.
    pub fn remove(&self, model: &str, id: i64) {
        if let Some(table) = self.state.lock().unwrap().tables.get_mut(model) {
            table.remove(&id);
        }
    }

    pub fn row(&self, model: &str, id: i64) -> Option<RawRecord> {
        let state = self.state.lock().unwrap();
        state.tables.get(model)?.get(&id).cloned()
    }

    /// Makes the next `search` return `ids` regardless of the domain.
    pub fn script_search(&self, ids: Vec<i64>) {
        self.state.lock().unwrap().scripted_searches.push_back(ids);
    }

    pub fn log(&self) -> ExecLog {
        ExecLog::new(self.ops_log.clone())
    }

    fn record(&self, op: TransportOp) {
        self.ops_log.lock().unwrap().push(op);
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    fn server_version(&self) -> String {
        self.state.lock().unwrap().version.clone()
    }

    async fn read(
        &self,
        model: &str,
        ids: &[i64],
        fields: Option<&[String]>,
    ) -> Result<Vec<RawRecord>> {
        self.record(TransportOp::Read {
            model: model.to_string(),
            ids: ids.to_vec(),
            fields: fields.map(<[String]>::to_vec),
        });

        let state = self.state.lock().unwrap();
        let Some(table) = state.tables.get(model) else {
            return Ok(vec![]);
        };

        Ok(ids
            .iter()
            .filter_map(|id| table.get(id))
            .map(|row| match fields {
                Some(fields) => row
                    .iter()
                    .filter(|(name, _)| *name == "id" || fields.contains(name))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
                None => row.clone(),
            })
            .collect())
    }

    async fn search(&self, model: &str, domain: &Json, order: Option<&str>) -> Result<Vec<i64>> {
        self.record(TransportOp::Search {
            model: model.to_string(),
            domain: domain.clone(),
            order: order.map(str::to_string),
        });

        let mut state = self.state.lock().unwrap();
        if let Some(ids) = state.scripted_searches.pop_front() {
            return Ok(ids);
        }

        let criteria = domain.as_array().cloned().unwrap_or_default();
        let Some(table) = state.tables.get(model) else {
            return Ok(vec![]);
        };

        Ok(table
            .iter()
            .filter(|(_, row)| matches_domain(&criteria, row))
            .map(|(id, _)| *id)
            .collect())
    }

    async fn create(&self, model: &str, payload: Json) -> Result<Json> {
        self.record(TransportOp::Create {
            model: model.to_string(),
            payload: payload.clone(),
        });

        let mut state = self.state.lock().unwrap();
        let rows = match payload {
            Json::Array(rows) => rows,
            row => vec![row],
        };

        let mut ids = vec![];
        for row in rows {
            let Json::Object(mut row) = row else {
                continue;
            };

            state.next_id += 1;
            let id = state.next_id;
            row.insert("id".to_string(), json!(id));

            state
                .tables
                .entry(model.to_string())
                .or_default()
                .insert(id, row);
            ids.push(id);
        }

        // A single created record is answered with a bare id.
        Ok(match &ids[..] {
            [id] => json!(id),
            _ => json!(ids),
        })
    }

    async fn write(&self, model: &str, ids: &[i64], payload: Json) -> Result<()> {
        self.record(TransportOp::Write {
            model: model.to_string(),
            ids: ids.to_vec(),
            payload: payload.clone(),
        });

        let mut state = self.state.lock().unwrap();
        let (Some(table), Json::Object(values)) = (state.tables.get_mut(model), payload) else {
            return Ok(());
        };

        for id in ids {
            if let Some(row) = table.get_mut(id) {
                row.extend(values.clone());
            }
        }

        Ok(())
    }

    async fn unlink(&self, model: &str, ids: &[i64]) -> Result<()> {
        self.record(TransportOp::Unlink {
            model: model.to_string(),
            ids: ids.to_vec(),
        });

        let mut state = self.state.lock().unwrap();
        if let Some(table) = state.tables.get_mut(model) {
            for id in ids {
                table.remove(id);
            }
        }

        Ok(())
    }
}

/// Evaluates a prefix domain; consecutive criteria are AND-ed.
fn matches_domain(criteria: &[Json], row: &RawRecord) -> bool {
    let mut rest = criteria;
    let mut result = true;

    while !rest.is_empty() {
        let (matched, tail) = eval(rest, row);
        result &= matched;
        rest = tail;
    }

    result
}

fn eval<'a>(criteria: &'a [Json], row: &RawRecord) -> (bool, &'a [Json]) {
    let Some((head, tail)) = criteria.split_first() else {
        return (true, criteria);
    };

    match head.as_str() {
        Some("!") => {
            let (matched, tail) = eval(tail, row);
            (!matched, tail)
        }
        Some(op @ ("&" | "|")) => {
            let (lhs, tail) = eval(tail, row);
            let (rhs, tail) = eval(tail, row);
            (if op == "&" { lhs && rhs } else { lhs || rhs }, tail)
        }
        _ => (eval_term(head, row), tail),
    }
}

fn eval_term(term: &Json, row: &RawRecord) -> bool {
    let [Json::String(field), Json::String(op), operand] = &term.as_array().unwrap()[..] else {
        panic!("unsupported term {term}");
    };

    // Singular references compare by id.
    let value = match row.get(field) {
        Some(Json::Array(pair)) if pair.len() == 2 && pair[1].is_string() => pair[0].clone(),
        Some(value) => value.clone(),
        None => Json::Bool(false),
    };

    match op.as_str() {
        "=" => value == *operand,
        "!=" => value != *operand,
        "in" => operand.as_array().is_some_and(|items| items.contains(&value)),
        "not in" => !operand.as_array().is_some_and(|items| items.contains(&value)),
        "ilike" => match (value.as_str(), operand.as_str()) {
            (Some(value), Some(pattern)) => value.to_lowercase().contains(&pattern.to_lowercase()),
            _ => false,
        },
        op => panic!("unsupported operator {op}"),
    }
}
