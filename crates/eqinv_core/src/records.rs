//! Tab-separated record sets as written by the client's `/outputfile inventory`.

pub const COLUMN_LOCATION: &str = "Location";
pub const COLUMN_NAME: &str = "Name";
pub const COLUMN_ID: &str = "ID";
pub const COLUMN_COUNT: &str = "Count";

pub const REQUIRED_COLUMNS: [&str; 4] = [COLUMN_LOCATION, COLUMN_NAME, COLUMN_ID, COLUMN_COUNT];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line number in the source text.
    pub line: usize,
    pub fields: Vec<String>,
}

impl RawRecord {
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecordSet {
    pub header: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawRecordSet {
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty());

        let header = lines
            .next()
            .map(|(_, line)| split_fields(line))
            .unwrap_or_default();
        let records = lines
            .map(|(line, text)| RawRecord {
                line,
                fields: split_fields(text),
            })
            .collect();

        Self { header, records }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|column| column == name)
            .or_else(|| {
                self.header
                    .iter()
                    .position(|column| column.eq_ignore_ascii_case(name))
            })
    }

    pub fn missing_columns(&self) -> Vec<&'static str> {
        REQUIRED_COLUMNS
            .into_iter()
            .filter(|column| self.column_index(column).is_none())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

fn split_fields(line: &str) -> Vec<String> {
    line.split('\t').map(|field| field.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::RawRecordSet;

    #[test]
    fn parse_skips_blank_lines_and_keeps_line_numbers() {
        let text = "Location\tName\tID\tCount\tSlots\r\nPrimary\tSword\t1\t1\t0\r\n\r\nGeneral1\tBag\t2\t1\t10\r\n";
        let set = RawRecordSet::parse(text);
        assert_eq!(set.header, vec!["Location", "Name", "ID", "Count", "Slots"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.records[0].line, 2);
        assert_eq!(set.records[1].line, 4);
        assert_eq!(set.records[1].field(1), Some("Bag"));
    }

    #[test]
    fn leading_byte_order_mark_is_dropped() {
        let set =
            RawRecordSet::parse("\u{FEFF}Location\tName\tID\tCount\nPrimary\tSword\t1\t1\n");
        assert_eq!(set.header[0], "Location");
        assert!(set.missing_columns().is_empty());
        assert_eq!(set.records[0].line, 2);
    }

    #[test]
    fn short_rows_leave_trailing_fields_absent() {
        let set = RawRecordSet::parse("Location\tName\tID\tCount\nPrimary\n");
        assert_eq!(set.records[0].fields, vec!["Primary"]);
        assert_eq!(set.records[0].field(1), None);
    }

    #[test]
    fn column_lookup_falls_back_to_case_insensitive() {
        let set = RawRecordSet::parse("location\tNAME\tId\tcount\n");
        assert_eq!(set.column_index("Location"), Some(0));
        assert_eq!(set.column_index("ID"), Some(2));
        assert!(set.missing_columns().is_empty());
    }

    #[test]
    fn missing_columns_are_reported_in_order() {
        let set = RawRecordSet::parse("Location\tCount\n");
        assert_eq!(set.missing_columns(), vec!["Name", "ID"]);
    }

    #[test]
    fn empty_text_has_no_header() {
        let set = RawRecordSet::parse("");
        assert!(set.header.is_empty());
        assert!(set.is_empty());
    }
}
