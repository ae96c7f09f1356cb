use crate::error::{ProcessingError, Result};
use crate::models::{Metric, StationMean, StationSeverity, TrendRow};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Date32Type, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    /// Write a trend table; one column per metric, nulls where no value contributed
    pub fn write_trend(&self, rows: &[TrendRow], path: &Path) -> Result<()> {
        if rows.is_empty() {
            debug!("Empty trend table, nothing written to {}", path.display());
            return Ok(());
        }

        let mut fields = vec![
            Field::new("period", DataType::Utf8, false),
            Field::new("bucket", DataType::Utf8, false),
            Field::new("bucket_start", DataType::Date32, false),
            Field::new("station", DataType::Utf8, true),
        ];
        fields.extend(
            Metric::ALL
                .iter()
                .map(|m| Field::new(m.field_name(), DataType::Float64, true)),
        );

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.period.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.label()))),
            Arc::new(Date32Array::from_iter_values(
                rows.iter().map(|r| Date32Type::from_naive_date(r.bucket_start)),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.station.as_deref()).collect::<Vec<_>>(),
            )),
        ];
        for metric in Metric::ALL {
            columns.push(Arc::new(Float64Array::from(
                rows.iter().map(|r| r.means.get(metric)).collect::<Vec<_>>(),
            )));
        }

        self.write_batch(fields, columns, path)?;
        info!("Wrote {} trend rows to {}", rows.len(), path.display());
        Ok(())
    }

    /// Write the station ranking with its 1-based rank
    pub fn write_ranking(&self, ranking: &[StationMean], path: &Path) -> Result<()> {
        if ranking.is_empty() {
            debug!("Empty ranking, nothing written to {}", path.display());
            return Ok(());
        }

        let fields = vec![
            Field::new("rank", DataType::UInt32, false),
            Field::new("station", DataType::Utf8, false),
            Field::new("mean_pm25", DataType::Float64, false),
            Field::new("readings", DataType::UInt64, false),
        ];
        let columns: Vec<ArrayRef> = vec![
            Arc::new(UInt32Array::from_iter_values(1..=ranking.len() as u32)),
            Arc::new(StringArray::from_iter_values(
                ranking.iter().map(|s| s.station.as_str()),
            )),
            Arc::new(Float64Array::from_iter_values(
                ranking.iter().map(|s| s.mean_pm25),
            )),
            Arc::new(UInt64Array::from_iter_values(
                ranking.iter().map(|s| s.readings as u64),
            )),
        ];

        self.write_batch(fields, columns, path)?;
        info!("Wrote {} ranked stations to {}", ranking.len(), path.display());
        Ok(())
    }

    /// Write the spatial summary, ready for map markers
    pub fn write_spatial(&self, stations: &[StationSeverity], path: &Path) -> Result<()> {
        if stations.is_empty() {
            debug!("Empty spatial summary, nothing written to {}", path.display());
            return Ok(());
        }

        let fields = vec![
            Field::new("station", DataType::Utf8, false),
            Field::new("latitude", DataType::Float64, false),
            Field::new("longitude", DataType::Float64, false),
            Field::new("mean_pm25", DataType::Float64, false),
            Field::new("band", DataType::Utf8, false),
            Field::new("color", DataType::Utf8, false),
        ];
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(
                stations.iter().map(|s| s.station.as_str()),
            )),
            Arc::new(Float64Array::from_iter_values(
                stations.iter().map(|s| s.latitude),
            )),
            Arc::new(Float64Array::from_iter_values(
                stations.iter().map(|s| s.longitude),
            )),
            Arc::new(Float64Array::from_iter_values(
                stations.iter().map(|s| s.mean_pm25),
            )),
            Arc::new(StringArray::from_iter_values(
                stations.iter().map(|s| s.band.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                stations.iter().map(|s| s.band.color()),
            )),
        ];

        self.write_batch(fields, columns, path)?;
        info!("Wrote {} map stations to {}", stations.len(), path.display());
        Ok(())
    }

    fn write_batch(&self, fields: Vec<Field>, columns: Vec<ArrayRef>, path: &Path) -> Result<()> {
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns)?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let columns = file_metadata
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        Ok(ParquetFileInfo {
            total_rows: file_metadata.num_rows(),
            row_groups: metadata.num_row_groups() as i32,
            columns,
            file_size: std::fs::metadata(path)?.len(),
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub columns: Vec<String>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - Columns: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.columns.join(", "),
            self.file_size as f64 / 1024.0,
            self.compression,
        )
    }
}
