// CSV repository implementation, reading a local file or fetching a URL once
use crate::application::ridership_repository::{LoadError, RidershipRepository};
use crate::domain::ridership::{Dataset, Record};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    File(std::path::PathBuf),
    Url(String),
}

impl DataSource {
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            DataSource::Url(source.to_string())
        } else {
            DataSource::File(source.into())
        }
    }

    fn name(&self) -> String {
        match self {
            DataSource::File(path) => path.display().to_string(),
            DataSource::Url(url) => url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsvRidershipRepository {
    source: DataSource,
}

impl CsvRidershipRepository {
    pub fn new(source: DataSource) -> Self {
        Self { source }
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        let unreachable = |cause: Box<dyn std::error::Error + Send + Sync>| LoadError::Unreachable {
            source_name: self.source.name(),
            cause,
        };

        match &self.source {
            DataSource::File(path) => tokio::fs::read(path)
                .await
                .map_err(|e| unreachable(e.into())),
            DataSource::Url(url) => {
                let response = reqwest::get(url)
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| unreachable(e.into()))?;
                let body = response.bytes().await.map_err(|e| unreachable(e.into()))?;
                Ok(body.to_vec())
            }
        }
    }
}

/// Parse delimited text with a header row into records.
///
/// Columns are matched by name and unknown columns are ignored. Empty
/// latitude/longitude cells leave the record without a position.
pub fn parse_records<R: std::io::Read>(reader: R, source_name: &str) -> Result<Vec<Record>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: Record = row.map_err(|e| LoadError::Malformed {
            source_name: source_name.to_string(),
            line: e.position().map(|p| p.line()).unwrap_or(0),
            cause: e.into(),
        })?;
        records.push(record);
    }
    Ok(records)
}

#[async_trait]
impl RidershipRepository for CsvRidershipRepository {
    async fn load(&self) -> Result<Dataset, LoadError> {
        let name = self.source.name();
        tracing::debug!("Loading ridership data from {}", name);

        let bytes = self.fetch().await?;
        let records = parse_records(bytes.as_slice(), &name)?;
        let dataset = Dataset::new(records);
        if dataset.is_empty() {
            tracing::warn!("Dataset {} has a header but no records", name);
        }

        tracing::info!(
            records = dataset.len(),
            days = dataset.days().len(),
            routes = dataset.routes().len(),
            "Data loaded from {}",
            name
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
day,route,hour,count,latitude,longitude
Mon,A,8,10,40.75,-73.98
Mon,B,9,4,,
Tue,A,8,7,40.71,-74.01
";

    #[test]
    fn test_parse_typed_rows() {
        let records = parse_records(SAMPLE.as_bytes(), "sample").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].hour, 8);
        assert_eq!(records[0].count, 10);
        assert_eq!(records[0].position(), Some((40.75, -73.98)));
        assert_eq!(records[1].position(), None);
    }

    #[test]
    fn test_parse_without_coordinate_columns() {
        let text = "route,day,count,hour,notes\nX,Fri,3,23,late\n";
        let records = parse_records(text.as_bytes(), "sample").unwrap();
        assert_eq!(records[0].route, "X");
        assert_eq!(records[0].hour, 23);
        assert_eq!(records[0].latitude, None);
    }

    #[test]
    fn test_malformed_row_reports_line() {
        let text = "day,route,hour,count\nMon,A,8,10\nMon,B,nine,4\n";
        match parse_records(text.as_bytes(), "sample") {
            Err(LoadError::Malformed { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.org/a.csv"),
            DataSource::Url("https://example.org/a.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("data/transport_data.csv"),
            DataSource::File("data/transport_data.csv".into())
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let repository = CsvRidershipRepository::new(DataSource::File(file.path().to_path_buf()));
        let dataset = repository.load().await.unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.days(), &["Mon", "Tue"]);
        assert_eq!(dataset.routes(), &["A", "B"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let repository = CsvRidershipRepository::new(DataSource::File(dir.path().join("none.csv")));
        assert!(matches!(
            repository.load().await,
            Err(LoadError::Unreachable { .. })
        ));
    }
}
