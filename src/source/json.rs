// src/source/json.rs
//! JSON recording source
//!
//! A subject file holds two JSON values back to back: a small leading
//! document with the header and skeleton, then the trial arrays. Opening
//! decodes the leading document only; `load_all_frames` skips past it and
//! decodes the trials.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::memory::{SubjectData, TrialData};
use super::{
    check_pass, MissingGrfReason, ProcessingPass, RecordingSource, Skeleton, SourceError,
    SourceResult, SubjectHeader, SubjectRecording,
};
use crate::config::constants::recording;

#[derive(Deserialize)]
struct LeadingDocument {
    header: SubjectHeader,
    #[serde(default)]
    skeleton: Option<Skeleton>,
}

#[derive(Serialize)]
struct LeadingDocumentRef<'a> {
    header: &'a SubjectHeader,
    skeleton: Option<&'a Skeleton>,
}

#[derive(Serialize, Deserialize)]
struct TrialDocument<T> {
    trials: T,
}

/// Reads subjects stored as JSON documents
#[derive(Debug, Clone, Default)]
pub struct JsonRecordingSource;

impl JsonRecordingSource {
    pub fn new() -> Self {
        Self
    }

    /// Write a subject in the format this source reads
    pub fn write_subject(path: &Path, subject: &SubjectData) -> SourceResult<()> {
        let io_err = |e: std::io::Error| SourceError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        let parse_err = |e: serde_json::Error| SourceError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
        let leading = LeadingDocumentRef {
            header: &subject.header,
            skeleton: subject.skeleton.as_ref(),
        };
        serde_json::to_writer(&mut writer, &leading).map_err(parse_err)?;
        writer.write_all(b"\n").map_err(io_err)?;
        serde_json::to_writer(&mut writer, &TrialDocument { trials: &subject.trials }).map_err(parse_err)?;
        writer.flush().map_err(io_err)
    }
}

fn document_reader(path: &Path) -> SourceResult<serde_json::Deserializer<serde_json::de::IoRead<BufReader<File>>>> {
    let file = File::open(path).map_err(|e| SourceError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::Deserializer::from_reader(BufReader::new(file)))
}

fn parse_error(path: &Path) -> impl Fn(serde_json::Error) -> SourceError + '_ {
    move |e| SourceError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

impl RecordingSource for JsonRecordingSource {
    type Subject = JsonSubject;

    fn open(&self, path: &Path) -> SourceResult<JsonSubject> {
        let mut reader = document_reader(path)?;
        let LeadingDocument { header, skeleton } =
            LeadingDocument::deserialize(&mut reader).map_err(parse_error(path))?;
        Ok(JsonSubject {
            path: path.to_path_buf(),
            header,
            skeleton,
            frames: None,
        })
    }

    fn recording_extension(&self) -> &str {
        recording::JSON_RECORDING_EXTENSION
    }
}

/// Subject handed out by [`JsonRecordingSource`]
#[derive(Debug)]
pub struct JsonSubject {
    path: PathBuf,
    header: SubjectHeader,
    skeleton: Option<Skeleton>,
    frames: Option<SubjectData>,
}

impl JsonSubject {
    fn frames(&self) -> SourceResult<&SubjectData> {
        self.frames.as_ref().ok_or(SourceError::FramesNotLoaded)
    }

    fn decode_trials(&self) -> SourceResult<Vec<TrialData>> {
        let mut reader = document_reader(&self.path)?;
        IgnoredAny::deserialize(&mut reader).map_err(parse_error(&self.path))?;
        let TrialDocument { trials } =
            TrialDocument::<Vec<TrialData>>::deserialize(&mut reader).map_err(parse_error(&self.path))?;
        reader.end().map_err(parse_error(&self.path))?;
        Ok(trials)
    }
}

impl SubjectRecording for JsonSubject {
    fn header(&self) -> &SubjectHeader {
        &self.header
    }

    fn missing_grf(&self, trial: usize) -> SourceResult<Vec<MissingGrfReason>> {
        Ok(self.frames()?.trial(trial)?.missing_grf.clone())
    }

    fn trial_length(&self, trial: usize) -> SourceResult<usize> {
        Ok(self.frames()?.trial(trial)?.length)
    }

    fn num_processing_passes(&self, trial: usize) -> SourceResult<usize> {
        Ok(self.frames()?.trial(trial)?.passes.len())
    }

    // JSON documents carry raw units only, so there is nothing to re-standardize.
    fn load_all_frames(&mut self, _do_not_standardize_force_plate_data: bool) -> SourceResult<()> {
        if self.frames.is_none() {
            debug!("Decoding trial frames from {}", self.path.display());
            let trials = self.decode_trials()?;
            self.frames = Some(SubjectData {
                header: self.header.clone(),
                trials,
                skeleton: None,
            });
        }
        Ok(())
    }

    fn processing_pass(&self, trial: usize, pass: usize) -> SourceResult<ProcessingPass> {
        Ok(self.frames()?.pass(trial, pass)?.clone())
    }

    fn read_skeleton(&self, pass: usize, _geometry_folder: &Path) -> SourceResult<Skeleton> {
        check_pass(0, pass, self.header.num_processing_passes)?;
        self.skeleton
            .clone()
            .ok_or_else(|| SourceError::SkeletonUnavailable(self.path.clone()))
    }
}
