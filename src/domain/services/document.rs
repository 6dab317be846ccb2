use crate::domain::columns::ColumnMap;
use crate::domain::model::RecordSet;
use crate::domain::services::address::format_address;
use crate::domain::services::amount::MonetaryAmount;
use crate::domain::services::consolidator::PRODUCT_SEPARATOR;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::error::Result;

pub const INVOICE_TITLE: &str = "Retail Invoice";
pub const SELLER_LOCATION: &str = "New Delhi, India";
const INVOICE_DATE_FORMAT: &str = "%d/%m/%Y";
// More than this many products are listed on one line.
const MAX_PRODUCT_LINES: usize = 4;

/// Seller details printed on every invoice of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_name: String,
    pub tin_number: String,
    pub support_email: String,
    pub website: String,
    pub customer_care_number: String,
}

/// Named areas of an invoice, in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    Header,
    CustomerId,
    OrderId,
    InvoiceNo,
    Seller,
    Buyer,
    InvoiceDate,
    Courier,
    Tracking,
    ItemDescription,
    Quantity,
    GrossValue,
    NetAmount,
    AmountPayable,
    AmountInWords,
    TermsAndConditions,
    Footer,
}

impl Region {
    /// Column or block heading a renderer prints above the region, if any.
    pub fn caption(&self) -> Option<&'static str> {
        match self {
            Region::Seller => Some("SELLER DETAILS"),
            Region::Buyer => Some("BUYER"),
            Region::ItemDescription => Some("ITEM DETAILS"),
            Region::Quantity => Some("QTY"),
            Region::GrossValue => Some("Gross Value"),
            Region::NetAmount => Some("Net Amount"),
            Region::AmountPayable => Some("Amount Payable:"),
            Region::AmountInWords => Some("Amount In Words :"),
            Region::TermsAndConditions => Some("Term and Conditions :"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionContent {
    pub text: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub centered: bool,
}

impl RegionContent {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            centered: false,
        }
    }

    fn centered(text: impl Into<String>) -> Self {
        Self {
            centered: true,
            ..Self::plain(text)
        }
    }

    fn emphasised(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            centered: true,
            ..Self::plain(text)
        }
    }
}

/// Rendering-engine independent invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub customer_name: String,
    pub regions: BTreeMap<Region, RegionContent>,
}

impl InvoiceDocument {
    pub fn text(&self, region: Region) -> Option<&str> {
        self.regions.get(&region).map(|c| c.text.as_str())
    }
}

pub struct InvoiceDocumentBuilder<'a> {
    company: &'a CompanyProfile,
    columns: &'a ColumnMap,
    today: NaiveDate,
}

impl<'a> InvoiceDocumentBuilder<'a> {
    pub fn new(company: &'a CompanyProfile, columns: &'a ColumnMap, today: NaiveDate) -> Self {
        Self {
            company,
            columns,
            today,
        }
    }

    /// Skipped rows and rows without a customer name produce no invoice.
    pub fn is_eligible(&self, records: &RecordSet, row: usize) -> bool {
        !records.is_skipped(row) && !records.get(row, &self.columns.customer_name).is_empty()
    }

    pub fn build(&self, records: &RecordSet, row: usize) -> Result<InvoiceDocument> {
        let cols = self.columns;
        let get = |caption: &str| records.get(row, caption);

        let value = MonetaryAmount::parse(
            &get(&cols.order_value),
            records.sheet_row(row),
            &cols.order_value,
        )?;
        let price = value.fixed();
        let quantity = match get(&cols.quantity) {
            q if q.trim().is_empty() => "1".to_string(),
            q => q,
        };
        let invoice_no = match get(&cols.invoice_no) {
            no if no.is_empty() => get(&cols.ref_no),
            no => no,
        };
        let order_date = self.order_date(&get(&cols.order_date));

        let mut regions = BTreeMap::new();
        regions.insert(Region::Header, RegionContent::emphasised(INVOICE_TITLE));
        regions.insert(
            Region::CustomerId,
            RegionContent::plain(format!("CUSTOMER ID : {}", get(&cols.customer_id))),
        );
        regions.insert(
            Region::OrderId,
            RegionContent::centered(format!("ORDER ID : {}", get(&cols.order_id))),
        );
        regions.insert(
            Region::InvoiceNo,
            RegionContent::plain(format!("INVOICE NO : {}", invoice_no)),
        );
        regions.insert(Region::Seller, RegionContent::plain(self.seller_block()));
        regions.insert(
            Region::Buyer,
            RegionContent::plain(format_address(records, row, cols)),
        );
        regions.insert(
            Region::InvoiceDate,
            RegionContent::plain(format!(
                "INVOICE DATE : {}",
                order_date.format(INVOICE_DATE_FORMAT)
            )),
        );
        regions.insert(
            Region::Courier,
            RegionContent::centered(format!("COURIER NAME: {}", get(&cols.courier_name))),
        );
        regions.insert(
            Region::Tracking,
            RegionContent::plain(format!("TRAKING (AWB) NO. : {}", get(&cols.tracking_number))),
        );
        regions.insert(
            Region::ItemDescription,
            RegionContent::plain(product_lines(&get(&cols.products))),
        );
        regions.insert(Region::Quantity, RegionContent::centered(quantity));
        regions.insert(Region::GrossValue, RegionContent::centered(price.clone()));
        regions.insert(Region::NetAmount, RegionContent::centered(price.clone()));
        regions.insert(Region::AmountPayable, RegionContent::centered(price));
        regions.insert(
            Region::AmountInWords,
            RegionContent::emphasised(value.words().to_uppercase()),
        );
        regions.insert(
            Region::TermsAndConditions,
            RegionContent::plain(self.terms_and_conditions()),
        );
        regions.insert(
            Region::Footer,
            RegionContent::emphasised(format!(
                "Visit us At : {}\nThis is a computer generated invoice. No signature required.",
                self.company.website
            )),
        );

        Ok(InvoiceDocument {
            customer_name: get(&cols.customer_name),
            regions,
        })
    }

    fn order_date(&self, raw: &str) -> NaiveDate {
        match parse_order_date(raw) {
            Some(date) => date,
            None => {
                if !raw.trim().is_empty() {
                    tracing::warn!("Unrecognised order date '{}', using {}", raw, self.today);
                }
                self.today
            }
        }
    }

    fn seller_block(&self) -> String {
        format!(
            "{}\n\n{}\nTelephone: {}\n\nCompany's TIN/VAT No. :- {}\n{}",
            self.company.company_name,
            SELLER_LOCATION,
            self.company.customer_care_number,
            self.company.tin_number,
            self.company.support_email
        )
    }

    fn terms_and_conditions(&self) -> String {
        [
            "(1) Refunds will be made as per our refund policy.".to_string(),
            "(2) VAT/CST is applicable on above amount is: - Rs 000.00/-".to_string(),
            format!(
                "(3) In Case of any queries, please call our customer care on: {} or email: {}",
                self.company.customer_care_number, self.company.support_email
            ),
            "(4) All disputes are subject to the exclusive jurisdiction of competent courts and forums in Delhi/New Delhi only.".to_string(),
        ]
        .join("\n")
    }
}

/// One product per line, or a single comma-separated line for long lists.
pub fn product_lines(products: &str) -> String {
    let items: Vec<&str> = products.split(PRODUCT_SEPARATOR).map(str::trim).collect();
    if items.len() > MAX_PRODUCT_LINES {
        items.join(", ")
    } else {
        items.join("\n")
    }
}

const DATE_FORMATS: [&str; 6] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%d %b %Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Day-first layouts win over month-first ones when both would match.
pub fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RawTable;

    fn company() -> CompanyProfile {
        CompanyProfile {
            company_name: "HRD ENTERPRISES".to_string(),
            tin_number: "07123456789".to_string(),
            support_email: "info@mineemart.com".to_string(),
            website: "www.mineemart.com".to_string(),
            customer_care_number: "011-4000000".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn record(pairs: &[(&str, &str)]) -> RecordSet {
        let mut table = RawTable::new(pairs.iter().map(|(c, _)| c.to_string()).collect());
        table.push_row(pairs.iter().map(|(_, v)| *v));
        RecordSet::load(table).unwrap()
    }

    #[test]
    fn test_build_full_invoice() {
        let set = record(&[
            ("CustomerName", "Alice"),
            ("CustomerID", "C1"),
            ("OrderID", "O1/O2"),
            ("InvoiceNo", "INV1"),
            ("Products", "Pen + Pencil"),
            ("OrderValue", "15"),
            ("Gender", "F"),
            ("CourierName", "BlueDart"),
            ("TrackingNumber", "AWB42"),
            ("OrderDate", "05/02/2024"),
        ]);
        let company = company();
        let columns = ColumnMap::default();
        let doc = InvoiceDocumentBuilder::new(&company, &columns, today())
            .build(&set, 0)
            .unwrap();

        assert_eq!(doc.customer_name, "Alice");
        assert_eq!(doc.text(Region::Header), Some("Retail Invoice"));
        assert_eq!(doc.text(Region::CustomerId), Some("CUSTOMER ID : C1"));
        assert_eq!(doc.text(Region::OrderId), Some("ORDER ID : O1/O2"));
        assert_eq!(doc.text(Region::InvoiceNo), Some("INVOICE NO : INV1"));
        assert_eq!(doc.text(Region::InvoiceDate), Some("INVOICE DATE : 05/02/2024"));
        assert_eq!(doc.text(Region::Courier), Some("COURIER NAME: BlueDart"));
        assert_eq!(doc.text(Region::Tracking), Some("TRAKING (AWB) NO. : AWB42"));
        assert_eq!(doc.text(Region::ItemDescription), Some("Pen\nPencil"));
        assert_eq!(doc.text(Region::Quantity), Some("1"));
        assert_eq!(doc.text(Region::GrossValue), Some("15.00"));
        assert_eq!(doc.text(Region::NetAmount), Some("15.00"));
        assert_eq!(doc.text(Region::AmountPayable), Some("15.00"));
        assert_eq!(doc.text(Region::AmountInWords), Some("FIFTEEN RUPEES"));
        assert!(doc.text(Region::Buyer).unwrap().starts_with("Mrs. Alice"));
        assert!(doc.text(Region::Seller).unwrap().starts_with("HRD ENTERPRISES\n"));
        assert!(doc.regions[&Region::AmountInWords].bold);
    }

    #[test]
    fn test_terms_interpolate_contact_details() {
        let set = record(&[("CustomerName", "Bob"), ("OrderValue", "1")]);
        let company = company();
        let columns = ColumnMap::default();
        let doc = InvoiceDocumentBuilder::new(&company, &columns, today())
            .build(&set, 0)
            .unwrap();

        let terms = doc.text(Region::TermsAndConditions).unwrap();
        assert!(terms.contains("customer care on: 011-4000000 or email: info@mineemart.com"));
        assert!(terms.contains("Rs 000.00"));
        assert!(doc.text(Region::Footer).unwrap().contains("www.mineemart.com"));
    }

    #[test]
    fn test_fallbacks() {
        let set = record(&[
            ("CustomerName", "Bob"),
            ("InvoiceNo", ""),
            ("RefNo", "REF-7"),
            ("QTY", "3"),
            ("OrderValue", "1234.5"),
            ("OrderDate", "someday"),
        ]);
        let company = company();
        let columns = ColumnMap::default();
        let doc = InvoiceDocumentBuilder::new(&company, &columns, today())
            .build(&set, 0)
            .unwrap();

        assert_eq!(doc.text(Region::InvoiceNo), Some("INVOICE NO : REF-7"));
        assert_eq!(doc.text(Region::Quantity), Some("3"));
        assert_eq!(doc.text(Region::GrossValue), Some("1234.50"));
        assert_eq!(doc.text(Region::InvoiceDate), Some("INVOICE DATE : 15/03/2024"));
        assert_eq!(
            doc.text(Region::AmountInWords),
            Some("ONE THOUSAND TWO HUNDRED THIRTY-FOUR RUPEES AND FIFTY PAISA")
        );
    }

    #[test]
    fn test_invalid_value_fails_the_row() {
        let set = record(&[("CustomerName", "Bob"), ("OrderValue", "n/a")]);
        let company = company();
        let columns = ColumnMap::default();
        let builder = InvoiceDocumentBuilder::new(&company, &columns, today());
        assert!(builder.build(&set, 0).is_err());
    }

    #[test]
    fn test_eligibility() {
        let mut table = RawTable::new(vec!["CustomerName".to_string(), "Skip".to_string()]);
        table.push_row(["Alice", "NO"]);
        table.push_row(["", "NO"]);
        table.push_row(["Carol", "Yes"]);
        let set = RecordSet::load(table).unwrap();
        let company = company();
        let columns = ColumnMap::default();
        let builder = InvoiceDocumentBuilder::new(&company, &columns, today());

        let eligible: Vec<usize> = (0..set.len()).filter(|&r| builder.is_eligible(&set, r)).collect();
        assert_eq!(eligible, vec![0]);
    }

    #[test]
    fn test_product_lines() {
        assert_eq!(product_lines("Pen"), "Pen");
        assert_eq!(product_lines("A + B+C"), "A\nB\nC");
        assert_eq!(product_lines("A+B+C+D+E"), "A, B, C, D, E");
    }

    #[test]
    fn test_parse_order_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 5);
        assert_eq!(parse_order_date("05/02/2024"), expected);
        assert_eq!(parse_order_date("2024-02-05"), expected);
        assert_eq!(parse_order_date("05-02-2024"), expected);
        assert_eq!(parse_order_date("05/02/2024 10:30:00"), expected);
        assert_eq!(parse_order_date(""), None);
        assert_eq!(parse_order_date("tomorrow"), None);
    }
}
