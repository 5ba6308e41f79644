use crate::workflows::ledger::adapters::RawPayment;
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) fn parse_payments<R: Read>(reader: R) -> Result<Vec<RawPayment>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut payments = Vec::new();

    for record in csv_reader.deserialize::<PaymentRow>() {
        let row = record?;
        payments.push(RawPayment {
            transaction_id: row.transaction_id,
            amount: row
                .amount
                .and_then(|raw| raw.parse::<f64>().ok())
                .filter(|amount| amount.is_finite()),
            status: row.status,
            created_at: row.created_at,
        });
    }

    Ok(payments)
}

#[derive(Debug, Deserialize)]
struct PaymentRow {
    #[serde(
        rename = "Transaction ID",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    transaction_id: Option<String>,
    #[serde(rename = "Amount", default, deserialize_with = "empty_string_as_none")]
    amount: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(
        rename = "Created At",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    created_at: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
