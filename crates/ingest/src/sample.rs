//! Bundled sample dataset: a small apparel supply chain as it arrives from
//! three sources (supplier forms, spreadsheet uploads, assessment reports),
//! with inconsistent naming across them.

use crate::record::SourceRecord;
use crate::resolver::MappingTableResolver;

/// Canonical id of the sample's final distribution center.
pub const SAMPLE_ENDPOINT: &str = "Brand A Distribution Center";

/// Alias table for the sample records.
pub fn sample_resolver() -> MappingTableResolver {
    MappingTableResolver::from_pairs([
        ("Fxncn 3", "Foxconn Facility No. 3"),
        ("Foxconn Unit 3", "Foxconn Facility No. 3"),
        ("FCN3", "Foxconn Facility No. 3"),
        ("Sunrise Textile India", "Sunrise Textiles"),
        ("Brand A DC", SAMPLE_ENDPOINT),
        ("OETX", "OEKO-TEX"),
        ("VN", "Vietnam"),
    ])
}

/// Sample records in arrival order.
pub fn sample_records() -> Vec<SourceRecord> {
    vec![
        // Supplier forms
        SourceRecord::new("Foxconn Facility No. 3")
            .with_region("Vietnam")
            .with_certification("OEKO-TEX")
            .with_tier("Tier 2")
            .with_relation("Supplies", "Sunrise Textiles", Some("100% cotton yarn")),
        SourceRecord::new("Sunrise Textiles")
            .with_region("India")
            .with_certification("GOTS")
            .with_tier("Tier 1")
            .with_relation("Delivers", SAMPLE_ENDPOINT, Some("finished fabric")),
        // Spreadsheet uploads
        SourceRecord::new("Fxncn 3")
            .with_region("VN")
            .with_certification("OETX")
            .with_tier("Tier 2")
            .with_relation("Ships materials", "Sunrise Textile India", Some("materials")),
        SourceRecord::new("Asia Components Ltd.")
            .with_region("China")
            .with_certification("ISO 9001")
            .with_tier("Tier 3")
            .with_relation("Produces", "FCN3", Some("circuit boards")),
        SourceRecord::new("Brand A DC")
            .with_region("US")
            .with_certification("N/A")
            .with_tier("Brand"),
        // Assessment reports
        SourceRecord::new("Foxconn Unit 3").with_risk_score(0.8),
        SourceRecord::new("Sunrise Textiles")
            .with_risk_score(0.78)
            .with_buffer(3.0),
        SourceRecord::new("Asia Components Ltd.").with_dependency_weight(0.7),
    ]
}
