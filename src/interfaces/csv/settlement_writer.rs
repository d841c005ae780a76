use crate::domain::money::Money;
use crate::domain::settlement::SettlementBreakdown;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct SettlementRecord<'a> {
    order: &'a str,
    total: Money,
    processing_fee: Money,
    commission: Money,
    debt_recovered: Money,
    platform_take: Money,
    merchant_payout: Money,
}

/// Writes settlement breakdowns as CSV, one row per order.
pub struct SettlementWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SettlementWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write(&mut self, order: &str, total: Money, breakdown: &SettlementBreakdown) -> Result<()> {
        self.writer.serialize(SettlementRecord {
            order,
            total,
            processing_fee: breakdown.processing_fee,
            commission: breakdown.platform_commission,
            debt_recovered: breakdown.debt_recovered,
            platform_take: breakdown.total_platform_take,
            merchant_payout: breakdown.merchant_payout,
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_header_and_rows() {
        let mut buffer = Vec::new();
        {
            let mut writer = SettlementWriter::new(&mut buffer);
            let breakdown = SettlementBreakdown {
                processing_fee: Money::new(4120),
                platform_commission: Money::new(5000),
                debt_recovered: Money::new(95_000),
                total_platform_take: Money::new(104_120),
                merchant_payout: Money::ZERO,
            };
            writer.write("A-1", Money::new(100_000), &breakdown).unwrap();
            writer.flush().unwrap();
        }

        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("order,total,processing_fee,commission,debt_recovered,platform_take,merchant_payout")
        );
        assert_eq!(lines.next(), Some("A-1,100000,4120,5000,95000,104120,0"));
    }
}
