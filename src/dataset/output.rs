//! Parquet output for training records.

use super::record::TrainingRecord;
use anyhow::{Context, Result};
use arrow::datatypes::{DataType, Field, Fields, Schema, SchemaRef};
use arrow::json::ReaderBuilder;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const BATCH_SIZE: usize = 1024;

fn utf8(name: &str) -> Field {
    Field::new(name, DataType::Utf8, true)
}

/// Arrow schema mirroring [`TrainingRecord`].
pub fn record_schema() -> SchemaRef {
    let message = DataType::Struct(Fields::from(vec![utf8("role"), utf8("content")]));
    let reward_model = DataType::Struct(Fields::from(vec![utf8("style"), utf8("ground_truth")]));
    let extra_info = DataType::Struct(Fields::from(vec![
        utf8("split"),
        utf8("index"),
        utf8("answer"),
        utf8("question"),
        utf8("search_results"),
        utf8("interaction_id"),
        utf8("query_time"),
        utf8("domain"),
        utf8("question_type"),
        utf8("static_or_dynamic"),
    ]));

    Arc::new(Schema::new(vec![
        utf8("data_source"),
        Field::new(
            "prompt",
            DataType::List(Arc::new(Field::new("item", message, true))),
            true,
        ),
        utf8("ability"),
        Field::new("reward_model", reward_model, true),
        Field::new("extra_info", extra_info, true),
    ]))
}

/// Write records to a parquet file, replacing any existing file.
pub fn write_records(records: &[TrainingRecord], path: &Path) -> Result<()> {
    let schema = record_schema();
    let mut decoder = ReaderBuilder::new(schema.clone())
        .with_batch_size(BATCH_SIZE)
        .build_decoder()
        .context("Failed to build record decoder")?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, schema.clone(), None).context("Failed to open parquet writer")?;

    if records.is_empty() {
        writer.write(&RecordBatch::new_empty(schema))?;
    }
    for chunk in records.chunks(BATCH_SIZE) {
        decoder
            .serialize(chunk)
            .context("Failed to convert records to arrow")?;
        if let Some(batch) = decoder.flush()? {
            writer.write(&batch).context("Failed to write record batch")?;
        }
    }

    writer.close().context("Failed to finalize parquet file")?;
    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::record::CragExample;
    use arrow::array::{Array, AsArray};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use serde_json::json;

    fn records(n: usize) -> Vec<TrainingRecord> {
        (0..n)
            .map(|i| {
                let example = CragExample::from_json(&json!({
                    "interaction_id": format!("id-{}", i),
                    "query": format!("question {}", i),
                    "answer": format!("answer {}", i),
                    "search_results": [{ "page_snippet": format!("snippet {}", i) }]
                }));
                TrainingRecord::from_example(&example, "train", i)
            })
            .collect()
    }

    fn read_back(path: &Path) -> Vec<RecordBatch> {
        ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap())
            .unwrap()
            .build()
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn nested_columns_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.parquet");
        let input = records(3);
        write_records(&input, &path).unwrap();

        let batches = read_back(&path);
        let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, 3);

        let batch = &batches[0];
        let source = batch.column_by_name("data_source").unwrap().as_string::<i32>();
        assert_eq!(source.value(0), "crag");

        let extra = batch.column_by_name("extra_info").unwrap().as_struct();
        let search = extra.column_by_name("search_results").unwrap().as_string::<i32>();
        let parsed: serde_json::Value = serde_json::from_str(search.value(2)).unwrap();
        assert_eq!(parsed, json!([{ "page_snippet": "snippet 2" }]));

        let prompt = batch.column_by_name("prompt").unwrap().as_list::<i32>();
        let first = prompt.value(0);
        let first = first.as_struct();
        assert_eq!(first.len(), 1);
        assert_eq!(first.column_by_name("role").unwrap().as_string::<i32>().value(0), "user");
    }

    #[test]
    fn large_inputs_span_multiple_batches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.parquet");
        write_records(&records(BATCH_SIZE + 5), &path).unwrap();

        let rows: usize = read_back(&path).iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, BATCH_SIZE + 5);
    }

    #[test]
    fn empty_split_still_writes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validation.parquet");
        write_records(&[], &path).unwrap();

        let rows: usize = read_back(&path).iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, 0);
    }
}
