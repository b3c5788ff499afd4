use std::{io::Read, path::Path};

use app_core::string_error::ErrorStringExt;

use crate::chart::AxisField;

/// One state's row of the survey data.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub state: String,
    pub abbr: String,
    pub poverty: f64,
    pub age: f64,
    pub income: f64,
    pub obesity: f64,
    pub smokes: f64,
    pub healthcare: f64,
}

impl Record {
    pub fn x_value(&self, field: AxisField) -> f64 {
        match field {
            AxisField::Poverty => self.poverty,
            AxisField::Age => self.age,
            AxisField::Income => self.income,
        }
    }
}

/// Column positions of the fields we read, looked up by header name.
struct Columns {
    state: Option<usize>,
    abbr: Option<usize>,
    numeric: [Option<usize>; 6],
}

const NUMERIC_COLUMNS: [&str; 6] = ["poverty", "age", "income", "obesity", "smokes", "healthcare"];

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            state: find("state"),
            abbr: find("abbr"),
            numeric: NUMERIC_COLUMNS.map(find),
        }
    }

    /// A field is absent if its column is missing from the header or the
    /// row is too short to reach it.
    fn record(&self, row: &csv::StringRecord) -> Record {
        let text = |col: Option<usize>| col.and_then(|i| row.get(i));
        let [poverty, age, income, obesity, smokes, healthcare] =
            self.numeric.map(|col| coerce_number(text(col)));
        Record {
            state: text(self.state).unwrap_or_default().to_string(),
            abbr: text(self.abbr).unwrap_or_default().to_string(),
            poverty,
            age,
            income,
            obesity,
            smokes,
            healthcare,
        }
    }
}

/// Convert a field to a number without ever failing.
///
/// An absent field gives NaN, blank text gives 0, and text that is not a
/// decimal number or an unsigned `0x`/`0o`/`0b` integer gives NaN.
pub fn coerce_number(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return f64::NAN;
    };
    let trimmed = raw.trim();
    match trimmed {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => (),
    }
    if let Some(value) = parse_radix_integer(trimmed) {
        return value;
    }
    // `f64::from_str` also accepts spellings like "inf" or "NaN".
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Integers written as `0x1F`, `0o17` or `0b101`. `None` if `text` has no
/// such prefix, NaN if the digits after it are missing or invalid.
fn parse_radix_integer(text: &str) -> Option<f64> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let value = digits.chars().try_fold(0.0, |acc, c| {
        c.to_digit(radix)
            .map(|digit| acc * radix as f64 + digit as f64)
    });
    Some(value.unwrap_or(f64::NAN))
}

/// The records of the data file in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn from_path(path: &Path) -> Result<Self, String> {
        let file = std::fs::File::open(path)
            .err_to_string(&format!("could not open data file {:?}", path))?;
        let dataset = Self::from_reader(file)?;
        log::info!("loaded {} records from {:?}", dataset.len(), path);
        Ok(dataset)
    }

    /// Parse CSV with a header row. Fails as a whole if the CSV structure
    /// cannot be read; values themselves are never rejected.
    pub fn from_reader(reader: impl Read) -> Result<Self, String> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let columns = Columns::from_headers(
            rdr.headers()
                .err_to_string("could not read header of data file")?,
        );
        let mut records = Vec::new();
        for row in rdr.records() {
            let row = row.err_to_string("could not parse data file")?;
            records.push(columns.record(&row));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,state,abbr,poverty,povertyMoe,age,ageMoe,income,incomeMoe,\
healthcare,healthcareLow,healthcareHigh,obesity,obesityLow,obesityHigh,smokes,smokesLow,smokesHigh";

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(Some("12.5")), 12.5);
        assert_eq!(coerce_number(Some(" 42 ")), 42.0);
        assert_eq!(coerce_number(Some("1e3")), 1000.0);
        assert_eq!(coerce_number(Some("-0.5")), -0.5);
        assert_eq!(coerce_number(Some("")), 0.0);
        assert_eq!(coerce_number(Some("   ")), 0.0);
        assert_eq!(coerce_number(Some("-Infinity")), f64::NEG_INFINITY);
        assert!(coerce_number(None).is_nan());
        assert!(coerce_number(Some("abc")).is_nan());
        assert!(coerce_number(Some("12abc")).is_nan());
        assert!(coerce_number(Some("inf")).is_nan());
        assert!(coerce_number(Some("NaN")).is_nan());
    }

    #[test]
    fn test_coerce_prefixed_integers() {
        assert_eq!(coerce_number(Some("0x10")), 16.0);
        assert_eq!(coerce_number(Some(" 0XfF ")), 255.0);
        assert_eq!(coerce_number(Some("0o17")), 15.0);
        assert_eq!(coerce_number(Some("0b101")), 5.0);
        assert!(coerce_number(Some("0x")).is_nan());
        assert!(coerce_number(Some("0xZZ")).is_nan());
        assert!(coerce_number(Some("0b12")).is_nan());
        // signs are not allowed with a prefix
        assert!(coerce_number(Some("-0x10")).is_nan());
    }

    #[test]
    fn test_from_reader() {
        init();
        let raw = format!(
            "{HEADER}\n\
1,Alabama,AL,19.3,0.5,38.6,0.2,42830,598,13.9,12.7,15.1,33.5,32.1,35,21.1,19.4,22.8\n\
2,Alaska,AK,11.2,0.9,33.3,0.3,71583,1784,15,13.3,16.8,29.7,27.8,31.6,19.9,18.2,21.6\n"
        );
        let dataset = Dataset::from_reader(raw.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);

        let al = &dataset.records()[0];
        assert_eq!(al.state, "Alabama");
        assert_eq!(al.abbr, "AL");
        assert_eq!(al.poverty, 19.3);
        assert_eq!(al.age, 38.6);
        assert_eq!(al.income, 42830.0);
        assert_eq!(al.obesity, 33.5);
        assert_eq!(al.smokes, 21.1);
        assert_eq!(al.healthcare, 13.9);
        assert_eq!(al.x_value(AxisField::Income), 42830.0);

        assert_eq!(dataset.records()[1].abbr, "AK");
    }

    #[test]
    fn test_numeric_fields_are_numbers_for_well_formed_rows() {
        let raw = "state,abbr,poverty,age,income,obesity,smokes,healthcare\n\
A,AA,1,2,3,4,5,6\n\
B,BB,7.5,8.25,9e1,10,11,12\n";
        let dataset = Dataset::from_reader(raw.as_bytes()).unwrap();
        for record in dataset.iter() {
            for value in [
                record.poverty,
                record.age,
                record.income,
                record.obesity,
                record.smokes,
                record.healthcare,
            ] {
                assert!(value.is_finite());
            }
        }
        assert_eq!(dataset.records()[1].income, 90.0);
    }

    #[test]
    fn test_malformed_values_become_nan() {
        init();
        // `smokes` is missing from the header, `age` is empty in the first
        // row, `income` is not a number in the second row and the third row
        // is cut short.
        let raw = "state,abbr,poverty,age,income,obesity,healthcare\n\
A,AA,1,,3,4,6\n\
B,BB,7,8,n/a,10,12\n\
C,CC,5\n";
        let dataset = Dataset::from_reader(raw.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);

        let [a, b, c] = dataset.records() else {
            panic!("expected three records");
        };
        assert_eq!(a.age, 0.0);
        assert!(a.smokes.is_nan());
        assert!(b.income.is_nan());
        assert_eq!(c.poverty, 5.0);
        assert!(c.age.is_nan());
        assert!(c.healthcare.is_nan());
    }

    #[test]
    fn test_header_only_gives_empty_dataset() {
        let dataset = Dataset::from_reader(HEADER.as_bytes()).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_missing_file_fails() {
        init();
        let res = Dataset::from_path(Path::new("/this/path/does/not/exist.csv"));
        let err = res.unwrap_err();
        assert!(err.starts_with("could not open data file"));
    }

    #[test]
    fn test_invalid_utf8_fails_whole_load() {
        let mut raw = b"state,abbr,poverty\nA,AA,1\n".to_vec();
        raw.extend_from_slice(&[b'B', b',', 0xff, 0xfe, b',', b'2', b'\n']);
        assert!(Dataset::from_reader(&raw[..]).is_err());
    }
}
