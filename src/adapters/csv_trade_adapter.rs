//! CSV file trade source.
//!
//! Expects one file per delivery day, `trades_<YYYYMMDD>.csv`, with columns
//! `trade_id,period,volume`. Rows sharing a `trade_id` form one trade.

use crate::domain::error::TradeSourceError;
use crate::domain::trade::{Trade, TradePeriod};
use crate::ports::trade_port::TradePort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub struct CsvTradeAdapter {
    base_path: PathBuf,
}

impl CsvTradeAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, date: NaiveDate) -> PathBuf {
        self.base_path
            .join(format!("trades_{}.csv", date.format("%Y%m%d")))
    }
}

fn malformed(line: u64, reason: impl std::fmt::Display) -> TradeSourceError {
    TradeSourceError::Unexpected {
        reason: format!("line {line}: {reason}"),
    }
}

impl TradePort for CsvTradeAdapter {
    fn get_trades(&self, date: NaiveDate) -> Result<Vec<Trade>, TradeSourceError> {
        let path = self.csv_path(date);
        let content = fs::read(&path).map_err(|e| TradeSourceError::Unavailable {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_slice());
        let mut trades: Vec<Trade> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TradeSourceError::Unexpected {
                reason: format!("CSV parse error: {}", e),
            })?;
            let line = record.position().map_or(0, |p| p.line());

            let trade_id = record
                .get(0)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| malformed(line, "missing trade_id column"))?;

            let period: i32 = record
                .get(1)
                .ok_or_else(|| malformed(line, "missing period column"))?
                .parse()
                .map_err(|e| malformed(line, format!("invalid period value: {}", e)))?;

            let volume: f64 = record
                .get(2)
                .ok_or_else(|| malformed(line, "missing volume column"))?
                .parse()
                .map_err(|e| malformed(line, format!("invalid volume value: {}", e)))?;

            let slot = *index.entry(trade_id.to_string()).or_insert_with(|| {
                trades.push(Trade::new(trade_id, Vec::new()));
                trades.len() - 1
            });
            trades[slot].periods.push(TradePeriod::new(period, volume));
        }

        Ok(trades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "trade_id,period,volume\n\
            T1,1,100\n\
            T1,2,100\n\
            T2,1,50\n\
            T1,3,-20.5\n";

        fs::write(path.join("trades_20240102.csv"), csv_content).unwrap();
        fs::write(path.join("trades_20240103.csv"), "trade_id,period,volume\n").unwrap();
        fs::write(
            path.join("trades_20240104.csv"),
            "trade_id,period,volume\nT1,one,100\n",
        )
        .unwrap();

        (dir, path)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn get_trades_groups_rows_by_trade() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvTradeAdapter::new(path);

        let trades = adapter.get_trades(date(2024, 1, 2)).unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].id, "T1");
        assert_eq!(
            trades[0].periods,
            vec![
                TradePeriod::new(1, 100.0),
                TradePeriod::new(2, 100.0),
                TradePeriod::new(3, -20.5),
            ]
        );
        assert_eq!(trades[1].id, "T2");
        assert_eq!(trades[1].periods, vec![TradePeriod::new(1, 50.0)]);
    }

    #[test]
    fn header_only_file_has_no_trades() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvTradeAdapter::new(path);
        assert!(adapter.get_trades(date(2024, 1, 3)).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_unavailable() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvTradeAdapter::new(path);

        let err = adapter.get_trades(date(2024, 2, 1)).unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn malformed_row_is_unexpected() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvTradeAdapter::new(path);

        let err = adapter.get_trades(date(2024, 1, 4)).unwrap_err();
        assert!(!err.is_unavailable());
        assert!(err.to_string().contains("invalid period value"));
    }

    #[test]
    fn invalid_utf8_is_unexpected() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("trades_20240105.csv"),
            b"trade_id,period,volume\nT\xff1,1,100\n",
        )
        .unwrap();
        let adapter = CsvTradeAdapter::new(dir.path().to_path_buf());

        let err = adapter.get_trades(date(2024, 1, 5)).unwrap_err();
        assert!(matches!(err, TradeSourceError::Unexpected { .. }), "got {err:?}");
    }
}
