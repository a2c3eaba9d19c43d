//! Ordered operation lists and the JSON pipeline file format

use crate::condition::{RowCondition, TextMatchMode, ValueCondition};
use crate::error::{Error, Result};
use crate::operation::{FilterRow, Head, Operation, Sort};
use crate::parser::{read_table, DsvOptions};
use crate::status::ProcessStatus;
use crate::table::Table;
use crate::writer::write_table;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, warn};

/// A sequence of operations applied in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    steps: Vec<Operation>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: Vec<Operation>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Operation] {
        &self.steps
    }

    pub fn steps_mut(&mut self) -> &mut Vec<Operation> {
        &mut self.steps
    }

    pub fn push(&mut self, operation: Operation) {
        self.steps.push(operation);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Breadcrumb segment for a step, e.g. `#2 Sort`
    pub fn step_title(index: usize, operation: &Operation) -> String {
        format!("#{} {}", index + 1, operation.title())
    }

    /// Verify every step without touching any table
    pub fn verify(&self) -> ProcessStatus {
        let mut status = ProcessStatus::new();
        for (index, operation) in self.steps.iter().enumerate() {
            status.merge(
                operation
                    .verify_arguments()
                    .reparent(&Self::step_title(index, operation)),
            );
        }
        status
    }

    /// Verify, then apply each step in turn.
    ///
    /// The table is left untouched when verification fails. Otherwise steps
    /// run until one reports an error; later steps are skipped.
    pub fn run(&self, table: &mut Table) -> ProcessStatus {
        let mut status = self.verify();
        if !status.is_success() {
            return status;
        }
        for (index, operation) in self.steps.iter().enumerate() {
            let before = table.row_count();
            let step = operation
                .operate(table)
                .reparent(&Self::step_title(index, operation));
            debug!(
                step = index + 1,
                operation = operation.title(),
                rows_before = before,
                rows_after = table.row_count(),
                "applied step"
            );
            for entry in &step.warnings {
                warn!("{}", entry);
            }
            let failed = !step.is_success();
            status.merge(step);
            if failed {
                debug!(step = index + 1, "stopping after failed step");
                break;
            }
        }
        status
    }

    /// Bind every table operand by name
    pub fn bind(&mut self, tables: &HashMap<String, Rc<Table>>) -> Result<()> {
        for operation in &mut self.steps {
            for operand in operation.table_operands_mut() {
                let table = tables
                    .get(operand.name())
                    .ok_or_else(|| Error::UnknownTable(operand.name().to_string()))?;
                operand.bind(Rc::clone(table));
            }
        }
        Ok(())
    }
}

/// Where a table lives and how to read it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSource {
    pub path: PathBuf,
    #[serde(flatten)]
    pub options: DsvOptions,
}

impl TableSource {
    pub fn new(path: impl Into<PathBuf>, options: DsvOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    pub fn read(&self) -> Result<Table> {
        read_table(&self.path, &self.options)
    }

    pub fn write(&self, table: &Table) -> Result<()> {
        write_table(table, &self.path, &self.options)
    }
}

/// A pipeline file on disk
///
/// Relative paths are taken as they are, relative to the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineFile {
    pub input: TableSource,
    /// Extra tables referenced by name from join and concatenation steps
    #[serde(default)]
    pub tables: BTreeMap<String, TableSource>,
    pub steps: Vec<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<TableSource>,
}

impl PipelineFile {
    /// Load a pipeline file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the pipeline file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).map_err(|e| Error::FileWrite {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// Starter pipeline showing the file layout
    pub fn template() -> Self {
        Self {
            input: TableSource::new("input.tsv", DsvOptions::default().header(true)),
            tables: BTreeMap::new(),
            steps: vec![
                Operation::FilterRow(FilterRow {
                    condition: RowCondition::column(
                        0,
                        ValueCondition::not(ValueCondition::IsEmpty),
                    ),
                }),
                Operation::FilterRow(FilterRow {
                    condition: RowCondition::any_column(ValueCondition::text(
                        TextMatchMode::Contains,
                        "example",
                        false,
                    )),
                }),
                Operation::Sort(Sort::default()),
                Operation::Head(Head { count: 100 }),
            ],
            output: Some(TableSource::new(
                "output.tsv",
                DsvOptions::default().header(true),
            )),
        }
    }

    /// Read every named table
    pub fn read_tables(&self) -> Result<HashMap<String, Rc<Table>>> {
        self.tables
            .iter()
            .map(|(name, source)| Ok((name.clone(), Rc::new(source.read()?))))
            .collect()
    }

    /// Build the pipeline with its table operands bound
    pub fn pipeline(&self, tables: &HashMap<String, Rc<Table>>) -> Result<Pipeline> {
        let mut pipeline = Pipeline::from_steps(self.steps.clone());
        pipeline.bind(tables)?;
        Ok(pipeline)
    }

    /// Build an unbound pipeline; operand steps fail verification
    pub fn unbound_pipeline(&self) -> Pipeline {
        Pipeline::from_steps(self.steps.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{Join, SkipHead, TableOperand};
    use tempfile::tempdir;

    #[test]
    fn test_verify_titles_steps() {
        let pipeline = Pipeline::from_steps(vec![
            Operation::Head(Head { count: 1 }),
            Operation::FilterRow(FilterRow::default()),
        ]);
        let status = pipeline.verify();
        assert_eq!(status.errors.len(), 1);
        assert_eq!(status.errors[0].target, "#2 Filter rows > Unset");
    }

    #[test]
    fn test_run_refuses_invalid_pipeline() {
        let pipeline = Pipeline::from_steps(vec![
            Operation::Head(Head { count: 1 }),
            Operation::Head(Head { count: -1 }),
        ]);
        let mut table = Table::from_str_rows(&[&["a"], &["b"], &["c"]], false);
        let status = pipeline.run(&mut table);
        assert!(!status.is_success());
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_run_applies_in_order() {
        let pipeline = Pipeline::from_steps(vec![
            Operation::SkipHead(SkipHead { count: 1 }),
            Operation::Head(Head { count: 1 }),
        ]);
        let mut table = Table::from_str_rows(&[&["a"], &["b"], &["c"]], false);
        let status = pipeline.run(&mut table);
        assert!(status.is_success());
        assert_eq!(table.rows(), &[vec!["b".to_string()]]);
    }

    #[test]
    fn test_run_stops_at_failed_step() {
        let mut pipeline = Pipeline::new();
        pipeline.push(Operation::EditColumn(crate::operation::EditColumn {
            source_index: 0,
            conversion: crate::conversion::ValueConversion::arithmetic(
                crate::numeric::NumericDomain::Integer,
                crate::numeric::ArithmeticOp::Add,
                "1",
            ),
        }));
        pipeline.push(Operation::Head(Head { count: 0 }));
        let mut table = Table::from_str_rows(&[&["1"], &["x"]], false);
        let status = pipeline.run(&mut table);
        assert_eq!(status.errors.len(), 1);
        assert!(status.errors[0].target.starts_with("#1 Edit column > Row 1"));
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_bind_unknown_table() {
        let mut pipeline = Pipeline::from_steps(vec![Operation::InnerJoin(Join {
            target: TableOperand::named("missing"),
            ..Join::default()
        })]);
        let result = pipeline.bind(&HashMap::new());
        assert!(matches!(result, Err(Error::UnknownTable(name)) if name == "missing"));
    }

    #[test]
    fn test_pipeline_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        let file = PipelineFile::template();
        file.save(&path).unwrap();
        let loaded = PipelineFile::load(&path).unwrap();
        assert_eq!(loaded, file);
        assert!(loaded.unbound_pipeline().verify().is_success());
    }

    #[test]
    fn test_pipeline_file_defaults() {
        let json = r#"{
            "input": { "path": "in.csv", "separator": "," },
            "steps": [ { "type": "distinct" } ]
        }"#;
        let file: PipelineFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.input.options.separator, ",");
        assert!(!file.input.options.has_header);
        assert_eq!(file.input.options.encoding, "utf-8");
        assert!(file.tables.is_empty());
        assert!(file.output.is_none());
    }
}
