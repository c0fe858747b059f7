use anyhow::Context;
use std::collections::HashSet;
use std::path::Path;

pub const BRAND_COLUMN: &str = "brand";

/// Read the catalog CSV and return the distinct values of its `brand`
/// column, in order of first appearance. Blank cells, and short rows that
/// stop before the `brand` column, are skipped.
///
/// # Errors
///
/// Returns Err if the file can't be opened, isn't valid CSV, has no
/// `brand` column, or has a row with more fields than the header.
pub fn load_brands(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening catalog {}", path.display()))?;
    distinct_brands(&mut rdr)
}

fn distinct_brands<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> anyhow::Result<Vec<String>> {
    let headers = rdr.headers()?;
    let width = headers.len();
    let idx = headers
        .iter()
        .position(|h| h.trim() == BRAND_COLUMN)
        .ok_or_else(|| anyhow::anyhow!("catalog has no '{BRAND_COLUMN}' column"))?;

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.len() > width {
            let line = record.position().map_or(0, csv::Position::line);
            anyhow::bail!(
                "catalog line {line} has {} fields, expected {width}",
                record.len()
            );
        }
        let Some(brand) = record.get(idx) else {
            continue;
        };
        if brand.is_empty() {
            continue;
        }
        if seen.insert(brand.to_string()) {
            out.push(brand.to_string());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn distinct_in_first_seen_order() {
        let f = write_csv(
            "brand,model,volume\n\
             Liebherr,CN 4315,304\n\
             Bosch,KGN39,366\n\
             Liebherr,CNef 4845,357\n\
             AEG,RCB736,367\n\
             Bosch,KGE36,302\n",
        );
        let brands = load_brands(f.path()).unwrap();
        assert_eq!(brands, vec!["Liebherr", "Bosch", "AEG"]);
    }

    #[test]
    fn brand_column_need_not_be_first() {
        let f = write_csv("id,brand\n1,Gorenje\n2,Beko\n3,Gorenje\n");
        assert_eq!(load_brands(f.path()).unwrap(), vec!["Gorenje", "Beko"]);
    }

    #[test]
    fn blank_cells_are_skipped() {
        let f = write_csv("brand,model\nSmeg,FAB28\n,unknown\nSmeg,FAB32\n");
        assert_eq!(load_brands(f.path()).unwrap(), vec!["Smeg"]);
    }

    #[test]
    fn quoted_values_with_commas() {
        let f = write_csv("brand,model\n\"Fisher & Paykel, Ltd\",RF610\nHaier,HB26\n");
        assert_eq!(
            load_brands(f.path()).unwrap(),
            vec!["Fisher & Paykel, Ltd", "Haier"]
        );
    }

    #[test]
    fn missing_column_is_an_error() {
        let f = write_csv("maker,model\nBosch,KGN39\n");
        let err = load_brands(f.path()).unwrap_err();
        assert!(err.to_string().contains("no 'brand' column"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_brands(&dir.path().join("nope.csv")).is_err());
    }

    #[test]
    fn short_rows_are_read_as_far_as_they_go() {
        let f = write_csv("brand,model\nBosch,KGN39\nAEG\n");
        assert_eq!(load_brands(f.path()).unwrap(), vec!["Bosch", "AEG"]);
    }

    #[test]
    fn short_rows_missing_the_brand_are_skipped() {
        let f = write_csv("model,brand\nKGN39,Bosch\nRCB736\nCN4315,Liebherr\n");
        assert_eq!(load_brands(f.path()).unwrap(), vec!["Bosch", "Liebherr"]);
    }

    #[test]
    fn long_rows_are_an_error() {
        let f = write_csv("brand,model\nBosch,KGN39\nAEG,RCB736,extra\n");
        let err = load_brands(f.path()).unwrap_err();
        assert!(err.to_string().contains("line 3 has 3 fields"), "{err}");
    }
}
