use crate::domain::money::{Money, Percent};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One raw row of a quote batch: `order, total, debt, commission`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct OrderRecord {
    order: String,
    total: Decimal,
    debt: Option<Decimal>,
    commission: Option<Decimal>,
}

/// A validated settlement quote request.
#[derive(Debug, PartialEq, Clone)]
pub struct QuoteRequest {
    pub order: String,
    pub total: Money,
    pub debt: Money,
    /// `None` falls back to the configured commission.
    pub commission: Option<Percent>,
}

impl TryFrom<OrderRecord> for QuoteRequest {
    type Error = PaymentError;

    fn try_from(record: OrderRecord) -> Result<Self> {
        Ok(Self {
            total: Money::try_from(record.total)?,
            debt: record.debt.map(Money::try_from).transpose()?.unwrap_or_default(),
            commission: record.commission.map(Percent::new).transpose()?,
            order: record.order,
        })
    }
}

pub struct OrderReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OrderReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Streams the rows, validating each one independently.
    pub fn orders(self) -> impl Iterator<Item = Result<QuoteRequest>> {
        self.reader
            .into_deserialize::<OrderRecord>()
            .map(|result| result.map_err(PaymentError::from).and_then(QuoteRequest::try_from))
    }
}
