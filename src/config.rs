use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TraceError};
use crate::pattern::PatternSpec;
use crate::trace::write_trace;
use crate::{log_info, log_warn};

/// One trace to produce: which pattern, and where to write it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceJob {
    #[serde(flatten)]
    pub pattern: PatternSpec,
    pub output: PathBuf,
}

impl TraceJob {
    pub fn new(pattern: PatternSpec, output: impl Into<PathBuf>) -> Self {
        TraceJob {
            pattern,
            output: output.into(),
        }
    }

    /// A job for `pattern` writing to its default file name in the working
    /// directory, e.g. `sequential_access.csv`.
    pub fn with_default_output(pattern: PatternSpec) -> Self {
        TraceJob::with_output(pattern, None)
    }

    /// Writes to `output` when given, otherwise to the pattern's default
    /// file name.
    pub fn with_output(pattern: PatternSpec, output: Option<PathBuf>) -> Self {
        let output = output.unwrap_or_else(|| default_output(&pattern));
        TraceJob::new(pattern, output)
    }

    /// Generates the pattern and writes it out. Returns the number of
    /// addresses written.
    pub fn run(&self) -> Result<usize> {
        let addresses = self.pattern.generate()?;
        write_trace(&self.output, &addresses)?;
        Ok(addresses.len())
    }
}

pub fn default_output(pattern: &PatternSpec) -> PathBuf {
    PathBuf::from(format!("{}_access.csv", pattern.name()))
}

/// A batch of jobs, loaded from JSON:
///
/// ```json
/// { "jobs": [
///     { "kind": "sequential", "start": "0x1000", "count": 10000, "step": 4,
///       "output": "sequential_access.csv" },
///     { "kind": "random", "count": 100000, "range": "0xFFFF", "seed": 7,
///       "output": "traces/random_access.csv" }
/// ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFile {
    pub jobs: Vec<TraceJob>,
}

impl JobFile {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| TraceError::filesystem(path, e))?;
        let job_file: JobFile = serde_json::from_reader(BufReader::new(file))?;
        if job_file.jobs.is_empty() {
            log_warn!("Job file {} lists no jobs", path.display());
        }
        Ok(job_file)
    }

    /// Runs every job in order, stopping at the first failure. Returns the
    /// address count of each completed job.
    pub fn run(&self) -> Result<Vec<usize>> {
        let mut counts = Vec::with_capacity(self.jobs.len());
        for (i, job) in self.jobs.iter().enumerate() {
            let count = job.run()?;
            log_info!(
                "Job {}/{}: {} {} addresses -> {}",
                i + 1,
                self.jobs.len(),
                count,
                job.pattern.name(),
                job.output.display()
            );
            counts.push(count);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rstest::rstest;

    use super::*;
    use crate::address::AddressRecord;
    use crate::trace::read_trace;

    #[test]
    fn test_default_output_names() {
        assert_eq!(
            default_output(&PatternSpec::sequential()),
            PathBuf::from("sequential_access.csv")
        );
        assert_eq!(
            TraceJob::with_default_output(PatternSpec::repeated()).output,
            PathBuf::from("repeated_access.csv")
        );
    }

    #[rstest]
    #[case::explicit(Some(PathBuf::from("traces/loop.csv")), "traces/loop.csv")]
    #[case::default(None, "looping_access.csv")]
    fn test_with_output(#[case] output: Option<PathBuf>, #[case] expected: &str) {
        let job = TraceJob::with_output(PatternSpec::looping(), output);
        assert_eq!(job.output, PathBuf::from(expected));
        assert_eq!(job.pattern, PatternSpec::looping());
    }

    #[test]
    fn test_job_run_writes_trace() {
        let temp_dir = tempfile::tempdir().unwrap();
        let job = TraceJob::new(
            PatternSpec::Looping {
                addresses: vec![AddressRecord::new(0x1000), AddressRecord::new(0x2000)],
                count: 5,
            },
            temp_dir.path().join("out").join("looping.csv"),
        );

        assert_eq!(job.run().unwrap(), 5);
        assert_eq!(
            fs::read_to_string(&job.output).unwrap(),
            "Address(Hex)\n0x1000\n0x2000\n0x1000\n0x2000\n0x1000\n"
        );
    }

    #[test]
    fn test_job_run_rejects_invalid_pattern_without_writing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let job = TraceJob::new(
            PatternSpec::Looping {
                addresses: vec![],
                count: 5,
            },
            temp_dir.path().join("looping.csv"),
        );

        assert!(matches!(job.run(), Err(TraceError::InvalidParameter(_))));
        assert!(!job.output.exists());
    }

    #[test]
    fn test_job_file_load_and_run() {
        let temp_dir = tempfile::tempdir().unwrap();
        let seq_path = temp_dir.path().join("seq.csv");
        let rand_path = temp_dir.path().join("rand.csv");
        let json = serde_json::json!({
            "jobs": [
                { "kind": "sequential", "start": "0x1000", "count": 3, "step": 4,
                  "output": &seq_path },
                { "kind": "random", "count": 50, "range": "255", "seed": 11,
                  "output": &rand_path }
            ]
        });
        let job_path = temp_dir.path().join("jobs.json");
        fs::write(&job_path, json.to_string()).unwrap();

        let job_file = JobFile::load(&job_path).unwrap();
        assert_eq!(job_file.jobs.len(), 2);
        assert_eq!(job_file.run().unwrap(), vec![3, 50]);

        let seq: Vec<String> = read_trace(&seq_path)
            .unwrap()
            .iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(seq, vec!["0x1000", "0x1004", "0x1008"]);

        let rand = read_trace(&rand_path).unwrap();
        assert_eq!(rand.len(), 50);
        assert!(rand.iter().all(|a| a.value() <= 255));
    }

    #[test]
    fn test_job_file_serde_round_trip() {
        let job_file = JobFile {
            jobs: vec![
                TraceJob::with_default_output(PatternSpec::sequential()),
                TraceJob::with_default_output(PatternSpec::looping()),
                TraceJob::new(PatternSpec::random(), "traces/random.csv"),
            ],
        };
        let json = serde_json::to_string_pretty(&job_file).unwrap();
        let back: JobFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, job_file);
    }

    #[test]
    fn test_reference_job_file_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/reference_jobs.json");
        let job_file = JobFile::load(&path).unwrap();
        let kinds: Vec<&str> = job_file.jobs.iter().map(|j| j.pattern.name()).collect();
        assert_eq!(kinds, vec!["sequential", "looping", "random", "repeated"]);
        assert_eq!(job_file.jobs[0].pattern, PatternSpec::sequential());
        assert_eq!(job_file.jobs[1].pattern, PatternSpec::looping());
        assert_eq!(job_file.jobs[2].pattern, PatternSpec::random());
    }

    #[test]
    fn test_job_file_errors() {
        let temp_dir = tempfile::tempdir().unwrap();

        let missing = JobFile::load(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, TraceError::Filesystem { .. }));

        let bad_path = temp_dir.path().join("bad.json");
        fs::write(&bad_path, r#"{"jobs": [{"kind": "zigzag", "output": "x.csv"}]}"#).unwrap();
        assert!(matches!(
            JobFile::load(&bad_path).unwrap_err(),
            TraceError::Config(_)
        ));
    }
}
