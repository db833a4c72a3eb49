// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Running catalogue passes over one tree.
//!
//! A [`Pipeline`] is resolved from [`PipelineOptions`] up front, so a bad
//! pass name fails before the tree is touched. Passes then run in order
//! over a single [`Session`]; the first failure stops the run and is
//! reported as a [`TugJsError`].

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use tugjs_ast::Ast;
use tugjs_core::TugJsError;
use tugjs_traverse::{Session, SessionOptions};

use crate::passes::{self, PassEntry};

/// Which passes a pipeline runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Pass names in run order. Empty selects the catalogue.
    pub passes: Vec<String>,
    /// When selecting the catalogue, include passes marked optional.
    pub include_optional: bool,
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// Passes that walked the tree.
    pub ran: Vec<String>,
    /// Passes whose check found nothing to do.
    pub skipped: Vec<String>,
}

/// An ordered, validated list of passes.
#[derive(Debug, Clone)]
pub struct Pipeline {
    entries: Vec<&'static PassEntry>,
}

impl Pipeline {
    pub fn new(options: &PipelineOptions) -> Result<Self, TugJsError> {
        if options.passes.is_empty() {
            let entries = passes::catalogue()
                .iter()
                .filter(|entry| options.include_optional || !entry.metadata.optional)
                .collect();
            return Ok(Pipeline { entries });
        }

        let mut entries: Vec<&'static PassEntry> = Vec::with_capacity(options.passes.len());
        for name in &options.passes {
            let entry = passes::find(name).ok_or_else(|| {
                let known: Vec<_> = passes::catalogue().iter().map(|entry| entry.name).collect();
                TugJsError::invalid_args_with_details(
                    format!("unknown pass `{}`", name),
                    json!({ "pass": name, "known": known }),
                )
            })?;
            if entries.iter().any(|seen| seen.name == entry.name) {
                return Err(TugJsError::invalid_args(format!(
                    "pass `{}` is listed more than once",
                    name
                )));
            }
            entries.push(entry);
        }
        Ok(Pipeline { entries })
    }

    /// Names of the passes in run order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }

    pub fn run(&self, session: &mut Session) -> Result<PipelineReport, TugJsError> {
        let mut report = PipelineReport::default();
        for entry in &self.entries {
            let root = session.ast().program();
            if !(entry.check)(session.ast(), root) {
                debug!(pass = entry.name, "nothing to do");
                report.skipped.push(entry.name.to_string());
                continue;
            }
            info!(pass = entry.name, experimental = entry.metadata.experimental, "running pass");
            let pass = (entry.build)();
            session.traverse_program(&pass, &mut ())?;
            report.ran.push(entry.name.to_string());
        }
        Ok(report)
    }
}

/// Run the passes selected by `options` over `ast` and hand the tree back.
pub fn transform(
    ast: Ast,
    options: &PipelineOptions,
    session_options: SessionOptions,
) -> Result<(Ast, PipelineReport), TugJsError> {
    let pipeline = Pipeline::new(options)?;
    let mut session = Session::with_options(ast, session_options);
    let report = pipeline.run(&mut session)?;
    Ok((session.into_ast(), report))
}
