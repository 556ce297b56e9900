//! CSV order-list loader.
//!
//! # CSV format
//!
//! One row per order, in arrival order.  `priority` may be left empty.
//!
//! ```csv
//! aisle,level,priority
//! 0,4,1
//! 3,0,
//! 7,2,0
//! ```
//!
//! Order ids are assigned from row position (`OrderId(0)` for the first data
//! row).  A row naming a slot outside the rack fails the whole load.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use asrs_core::OrderSpec;
use asrs_topology::WarehouseGraph;

use crate::{Order, OrderError, OrderResult, resolve_orders};

#[derive(Deserialize)]
struct OrderRecord {
    aisle:    u32,
    level:    u32,
    priority: Option<u32>,
}

/// Load orders from a CSV file.
pub fn load_orders_csv(path: &Path, graph: &WarehouseGraph) -> OrderResult<Vec<Order>> {
    let file = std::fs::File::open(path).map_err(OrderError::Io)?;
    load_orders_reader(file, graph)
}

/// Like [`load_orders_csv`] but accepts any `Read` source.
pub fn load_orders_reader<R: Read>(reader: R, graph: &WarehouseGraph) -> OrderResult<Vec<Order>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut specs = Vec::new();

    for result in csv_reader.deserialize::<OrderRecord>() {
        let row = result.map_err(|e| OrderError::Parse(e.to_string()))?;
        specs.push(OrderSpec {
            aisle:    row.aisle,
            level:    row.level,
            priority: row.priority,
        });
    }

    resolve_orders(graph, &specs)
}
