use crate::domain::columns::ColumnMap;
use crate::domain::model::RecordSet;

pub const COUNTRY: &str = "India";
pub const COUNTRY_DIAL_CODE: &str = "+91";

pub fn salutation(gender: &str) -> &'static str {
    match gender.trim().to_uppercase().as_str() {
        "F" => "Mrs.",
        "U" => "Miss",
        _ => "Mr.",
    }
}

/// Primary number, followed by `/alternate` when an alternate is given and
/// is not a `-` placeholder.
pub fn combine_phone(primary: &str, alternate: &str) -> String {
    let alternate = alternate.trim();
    if alternate.is_empty() || alternate == "-" {
        primary.to_string()
    } else {
        format!("{}/{}", primary, alternate)
    }
}

/// Buyer address block for one row.
pub fn format_address(records: &RecordSet, row: usize, columns: &ColumnMap) -> String {
    let phone = combine_phone(
        &records.get(row, &columns.phone),
        &records.get(row, &columns.alternate_number),
    );

    format!(
        "{} {}\n\n{}\n\n{}\n{} Pin {}\n{}\n{}\n{}{}",
        salutation(&records.get(row, &columns.gender)),
        records.get(row, &columns.customer_name),
        records.get(row, &columns.address),
        records.get(row, &columns.city),
        records.get(row, &columns.state),
        records.get(row, &columns.pincode),
        COUNTRY,
        records.get(row, &columns.email_id),
        COUNTRY_DIAL_CODE,
        phone,
    )
}
