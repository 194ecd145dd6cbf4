// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use std::path::Path;

use crate::models::{BillItem, ExtractedFields};

/// Capability boundary for pulling structured fields off an uploaded
/// bill. The core consumes whatever comes back and does not validate
/// provenance; a real OCR backend slots in here.
pub trait BillExtractor {
    fn extract(&self, file: &Path) -> Result<ExtractedFields>;
}

/// Canned extraction result standing in for a real backend. Returns
/// the same sample payload for every file.
pub struct StubExtractor;

impl BillExtractor for StubExtractor {
    fn extract(&self, _file: &Path) -> Result<ExtractedFields> {
        let now = Utc::now();
        Ok(ExtractedFields {
            bill_number: format!("BILL-{}", now.timestamp_millis()),
            date: now.date_naive(),
            vendor: "Sample Vendor Inc.".to_string(),
            amount: Decimal::from(1250),
            tax: Decimal::from(225),
            items: vec![
                BillItem {
                    name: "Office Supplies".to_string(),
                    quantity: 1,
                    price: Decimal::from(1000),
                },
                BillItem {
                    name: "Printing Services".to_string(),
                    quantity: 1,
                    price: Decimal::from(250),
                },
            ],
        })
    }
}
