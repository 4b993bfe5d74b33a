//! # Phase Rule Table
//!
//! Static data describing, per document category, its governing phase,
//! whether it is required for phase advancement, and its slot
//! cardinality. [`uploadable_documents`] and [`required_documents`]
//! are pure lookups into this table — no state is consulted.
//!
//! The **funds gate** is the set of required categories whose
//! governing phase lies at or before `AWAITING_DOCS`; escrowed payment
//! is released the first time every one of them is approved while
//! funds are locked.

use serde::{Deserialize, Serialize};

use crate::phase::Phase;

/// The paperwork classes a shipment can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    /// Laboratory analysis of the pre-shipment sample.
    SampleAnalysis,
    /// Provisional invoice fixing price and quantity terms.
    ProformaInvoice,
    /// Itemized packing list for the containers.
    PackingList,
    /// Cargo insurance certificate.
    InsuranceCertificate,
    /// Carrier's bill of lading.
    BillOfLading,
    /// Certificate of origin for customs clearance.
    CertificateOfOrigin,
    /// Certified net/gross weight record.
    WeightCertificate,
    /// Post-delivery quality certificate.
    QualityCertificate,
    /// Free-form supplementary paperwork; unbounded slots.
    Supplementary,
}

/// Slot cardinality of a document category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    /// One slot; re-adding overwrites the existing entry.
    Single,
    /// Unbounded slots; re-adding appends.
    Generic,
}

/// The static rule attached to a document category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    /// The phase in which this category is uploadable.
    ///
    /// Generic categories ignore this and accept uploads in every
    /// phase up to and including `AWAITING_DOCS`.
    pub phase: Phase,
    /// Whether approval of this category gates phase advancement.
    pub required: bool,
    /// Single-slot or unbounded.
    pub cardinality: Cardinality,
}

impl DocumentCategory {
    /// Every category, in table order.
    pub const ALL: [DocumentCategory; 9] = [
        Self::SampleAnalysis,
        Self::ProformaInvoice,
        Self::PackingList,
        Self::InsuranceCertificate,
        Self::BillOfLading,
        Self::CertificateOfOrigin,
        Self::WeightCertificate,
        Self::QualityCertificate,
        Self::Supplementary,
    ];

    /// The static rule governing this category.
    pub fn rule(&self) -> CategoryRule {
        match self {
            Self::SampleAnalysis => CategoryRule {
                phase: Phase::Sample,
                required: true,
                cardinality: Cardinality::Single,
            },
            Self::ProformaInvoice => CategoryRule {
                phase: Phase::Details,
                required: true,
                cardinality: Cardinality::Single,
            },
            Self::PackingList => CategoryRule {
                phase: Phase::Details,
                required: false,
                cardinality: Cardinality::Single,
            },
            Self::InsuranceCertificate => CategoryRule {
                phase: Phase::Funding,
                required: true,
                cardinality: Cardinality::Single,
            },
            Self::BillOfLading => CategoryRule {
                phase: Phase::AwaitingDocs,
                required: true,
                cardinality: Cardinality::Single,
            },
            Self::CertificateOfOrigin => CategoryRule {
                phase: Phase::AwaitingDocs,
                required: true,
                cardinality: Cardinality::Single,
            },
            Self::WeightCertificate => CategoryRule {
                phase: Phase::AwaitingDocs,
                required: true,
                cardinality: Cardinality::Single,
            },
            Self::QualityCertificate => CategoryRule {
                phase: Phase::Confirmed,
                required: false,
                cardinality: Cardinality::Single,
            },
            Self::Supplementary => CategoryRule {
                phase: Phase::Sample,
                required: false,
                cardinality: Cardinality::Generic,
            },
        }
    }

    /// The canonical snake_case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SampleAnalysis => "sample_analysis",
            Self::ProformaInvoice => "proforma_invoice",
            Self::PackingList => "packing_list",
            Self::InsuranceCertificate => "insurance_certificate",
            Self::BillOfLading => "bill_of_lading",
            Self::CertificateOfOrigin => "certificate_of_origin",
            Self::WeightCertificate => "weight_certificate",
            Self::QualityCertificate => "quality_certificate",
            Self::Supplementary => "supplementary",
        }
    }

    /// Whether uploads to this category are accepted in `phase`.
    ///
    /// Single-slot categories are uploadable exactly in their governing
    /// phase. Generic categories are uploadable in any phase up to and
    /// including `AWAITING_DOCS`.
    pub fn uploadable_in(&self, phase: Phase) -> bool {
        let rule = self.rule();
        match rule.cardinality {
            Cardinality::Single => rule.phase == phase,
            Cardinality::Generic => phase.ordinal() <= Phase::AwaitingDocs.ordinal(),
        }
    }

    /// Whether this category gates the release of escrowed funds.
    pub fn gates_funds(&self) -> bool {
        let rule = self.rule();
        rule.required && rule.phase.ordinal() <= Phase::AwaitingDocs.ordinal()
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The categories accepting uploads in `phase`. Pure table lookup.
pub fn uploadable_documents(phase: Phase) -> Vec<DocumentCategory> {
    DocumentCategory::ALL
        .into_iter()
        .filter(|category| category.uploadable_in(phase))
        .collect()
}

/// The categories whose approval is required to advance out of `phase`.
/// Pure table lookup.
pub fn required_documents(phase: Phase) -> Vec<DocumentCategory> {
    DocumentCategory::ALL
        .into_iter()
        .filter(|category| {
            let rule = category.rule();
            rule.required && rule.phase == phase
        })
        .collect()
}

/// The categories gating the release of escrowed funds.
pub fn funds_gate_documents() -> Vec<DocumentCategory> {
    DocumentCategory::ALL
        .into_iter()
        .filter(DocumentCategory::gates_funds)
        .collect()
}
