//! Corpus loading: annotation files to song timelines.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::CorpusError;
use crate::segment::{AnnotationFormat, LabFormat};
use crate::song::SongTimeline;

/// Data-quality counters gathered while loading a corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    pub files_seen: usize,
    pub files_unreadable: usize,
    /// Timelines with no segments left after stripping `N`; excluded
    pub degenerate_songs: usize,
    /// Lines that were not `start end label`
    pub lines_skipped: usize,
    /// Three-field lines whose times were unusable
    pub segments_dropped: usize,
    pub no_chord_stripped: usize,
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s) seen, {} unreadable, {} degenerate, {} line(s) skipped, {} segment(s) dropped",
            self.files_seen,
            self.files_unreadable,
            self.degenerate_songs,
            self.lines_skipped,
            self.segments_dropped
        )
    }
}

/// One recording in the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub source: PathBuf,
    pub timeline: SongTimeline,
}

/// Every usable song timeline of a training run, in load order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    songs: Vec<Song>,
    stats: LoadStats,
}

impl Corpus {
    /// Build from in-memory timelines. Degenerate timelines are dropped and counted.
    pub fn from_timelines(timelines: impl IntoIterator<Item = SongTimeline>) -> Self {
        let mut corpus = Corpus::default();
        for (i, timeline) in timelines.into_iter().enumerate() {
            corpus.stats.no_chord_stripped += timeline.stripped_no_chord();
            corpus.push(PathBuf::from(format!("<song {i}>")), timeline);
        }
        corpus
    }

    fn push(&mut self, source: PathBuf, timeline: SongTimeline) {
        if timeline.is_degenerate() {
            self.stats.degenerate_songs += 1;
            debug!(source = %source.display(), "degenerate timeline excluded");
            return;
        }
        self.songs.push(Song { source, timeline });
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn timelines(&self) -> impl Iterator<Item = &SongTimeline> {
        self.songs.iter().map(|s| &s.timeline)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }
}

/// Find annotation files under dataset roots.
///
/// Files match on extension (case-insensitive). The result is sorted so
/// repeated runs see the same order.
pub fn discover<P: AsRef<Path>>(roots: &[P], extensions: &[&str]) -> Result<Vec<PathBuf>, CorpusError> {
    let mut files = Vec::new();

    for root in roots {
        let root = root.as_ref();
        if !root.exists() {
            return Err(CorpusError::RootNotFound(root.to_path_buf()));
        }

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|source| CorpusError::Walk {
                root: root.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
            if matches {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Reads annotation files in one format into a [`Corpus`].
#[derive(Debug, Clone, Default)]
pub struct CorpusLoader<F = LabFormat> {
    format: F,
}

impl<F: AnnotationFormat> CorpusLoader<F> {
    pub fn new(format: F) -> Self {
        Self { format }
    }

    /// Discover files under `roots` using the format's extensions.
    pub fn discover<P: AsRef<Path>>(&self, roots: &[P]) -> Result<Vec<PathBuf>, CorpusError> {
        discover(roots, self.format.extensions())
    }

    /// Load every file. A file that cannot be read is counted and skipped.
    pub fn load<P: AsRef<Path>>(&self, paths: &[P]) -> Corpus {
        let mut corpus = Corpus::default();

        for path in paths {
            let path = path.as_ref();
            corpus.stats.files_seen += 1;

            // Stray non-UTF-8 bytes only spoil the label they sit in.
            let content = match std::fs::read(path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    corpus.stats.files_unreadable += 1;
                    warn!(path = %path.display(), error = %e, "skipping unreadable annotation file");
                    continue;
                }
            };

            self.add_content(&mut corpus, path.to_path_buf(), &content);
        }

        info!(
            format = self.format.name(),
            songs = corpus.len(),
            files = corpus.stats.files_seen,
            unreadable = corpus.stats.files_unreadable,
            degenerate = corpus.stats.degenerate_songs,
            lines_skipped = corpus.stats.lines_skipped,
            segments_dropped = corpus.stats.segments_dropped,
            "corpus loaded"
        );

        corpus
    }

    /// Parse one annotation text held in memory, as if read from `source`.
    pub fn load_str(&self, source: impl Into<PathBuf>, content: &str) -> Corpus {
        let mut corpus = Corpus::default();
        corpus.stats.files_seen = 1;
        self.add_content(&mut corpus, source.into(), content);
        corpus
    }

    fn add_content(&self, corpus: &mut Corpus, source: PathBuf, content: &str) {
        let parsed = self.format.parse(content);

        let skipped = parsed.skipped().count();
        let dropped = parsed.warnings().count();
        corpus.stats.lines_skipped += skipped;
        corpus.stats.segments_dropped += dropped;
        for fb in parsed.warnings() {
            debug!(source = %source.display(), line = fb.line, "{}", fb.message);
        }

        let timeline = SongTimeline::assemble(parsed.value);
        corpus.stats.no_chord_stripped += timeline.stripped_no_chord();
        corpus.push(source, timeline);
    }
}
