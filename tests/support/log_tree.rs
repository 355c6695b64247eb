use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builds a sandmark-style log tree: `<kind>/<host>/<YYYYMMDD_HHMMSS>/<commit>/<files>`.
pub struct LogTree {
    temp: TempDir,
}

impl LogTree {
    pub fn new() -> Self {
        Self {
            temp: tempfile::tempdir().expect("create tempdir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Write a run with a log and, when `results` is set, a summary file.
    pub fn run(&self, host: &str, stamp: &str, variant: &str, log: &str, results: bool) -> PathBuf {
        let dir = self
            .root()
            .join("sequential")
            .join(host)
            .join(stamp)
            .join("0a1b2c3d");
        std::fs::create_dir_all(&dir).expect("create run dir");
        std::fs::write(dir.join(format!("{variant}.orun.summary.log")), log).expect("write log");
        if results {
            std::fs::write(
                dir.join(format!("{variant}.orun.summary.bench")),
                "{\"name\":\"binarytrees\",\"time_secs\":1.5}\n",
            )
            .expect("write results");
        }
        dir
    }

    /// Write an arbitrary file relative to the root.
    pub fn file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root().join(relative);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        std::fs::write(&path, contents).expect("write file");
        path
    }
}
