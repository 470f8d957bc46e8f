//! Demo data
//!
//! Populates a kernel with one folder per file kind, each holding a handful
//! of public sample links.

use crate::error::ApiError;
use crate::kernel::Kernel;
use crate::types::FileKind;
use serde::Serialize;

const IMAGES: &[(&str, &str)] = &[
    ("Mountain Landscape", "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=800&h=600&fit=crop"),
    ("Ocean Sunset", "https://images.unsplash.com/photo-1507525428034-b723cf961d3e?w=800&h=600&fit=crop"),
    ("Forest Path", "https://images.unsplash.com/photo-1441974231531-c6227db76b6e?w=800&h=600&fit=crop"),
    ("City Skyline", "https://images.unsplash.com/photo-1449824913935-59a10b8d2000?w=800&h=600&fit=crop"),
];

const APPS: &[(&str, &str)] = &[
    ("Google", "https://www.google.com"),
    ("GitHub", "https://github.com"),
    ("YouTube", "https://www.youtube.com"),
    ("Stack Overflow", "https://stackoverflow.com"),
];

const MUSIC: &[(&str, &str)] = &[
    ("Radetzky March", "https://upload.wikimedia.org/wikipedia/commons/e/ef/USMC_Band_-_Radetzky_March.mp3"),
    ("Concertino for Flute in D Major", "https://upload.wikimedia.org/wikipedia/commons/4/4d/Flute_Concertino_in_D_major_-_United_States_Marine_Band.mp3"),
];

const VIDEOS: &[(&str, &str)] = &[
    ("Big Buck Bunny", "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4"),
    ("Sintel", "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/Sintel.mp4"),
    ("Tears of Steel", "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/TearsOfSteel.mp4"),
];

const DOCUMENTS: &[(&str, &str)] = &[
    ("RFC 793 - TCP Protocol", "https://www.rfc-editor.org/rfc/rfc793.txt"),
    ("Git Documentation", "https://git-scm.com/doc"),
    ("Svelte Tutorial", "https://svelte.dev/tutorial"),
];

/// Folder name and sample entries for each kind.
pub fn catalog() -> [(&'static str, FileKind, &'static [(&'static str, &'static str)]); 5] {
    [
        ("Images", FileKind::Image, IMAGES),
        ("Apps", FileKind::App, APPS),
        ("Music", FileKind::Music, MUSIC),
        ("Videos", FileKind::Video, VIDEOS),
        ("Documents", FileKind::Document, DOCUMENTS),
    ]
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub folders_created: usize,
    pub files_written: usize,
}

/// Create the sample folders under the current directory and fill them.
/// The cursor is returned to where it started.
pub fn populate(kernel: &Kernel) -> Result<SeedReport, ApiError> {
    let start = kernel.cursor().to_string();
    let mut report = SeedReport::default();
    for (folder, kind, entries) in catalog() {
        if kernel.add_directory(folder)? {
            report.folders_created += 1;
        }
        kernel.change_directory(folder)?;
        for (name, url) in entries {
            kernel.add_file(name, url, kind)?;
            report.files_written += 1;
        }
        kernel.change_directory(&start)?;
    }
    tracing::info!(
        folders = report.folders_created,
        files = report.files_written,
        "Seeded demo data"
    );
    Ok(report)
}
