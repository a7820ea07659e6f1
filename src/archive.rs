//! Size trees from the member lists of ZIP and tar archives.
//!
//! Members are charted by their recorded sizes, nothing is extracted. Directory members
//! contribute nothing of their own and totals are summed bottom-up.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::errors::VizError;
use crate::listing::path_split;
use crate::progress::ProgressReporter;
use crate::size_tree::{SizeMode, SizeTree};

const TAR_EXTENSIONS: [&str; 4] = [".tar", ".tar.gz", ".tgz", ".tar.bz2"];

/// Whether `path` is a regular file named like a ZIP archive.
pub fn looks_like_zip(path: &str) -> bool {
    let path = Path::new(path);
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Whether `path` is a regular file named like a (possibly compressed) tar archive.
pub fn looks_like_tar(path: &str) -> bool {
    Path::new(path).is_file() && TAR_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Builds a size tree from the members of the ZIP archive at `path`.
///
/// With `compressed` set, members are sized by their stored (compressed) size, otherwise by
/// their uncompressed size.
pub fn tree_from_zip(
    path: &str,
    compressed: bool,
    progress: &ProgressReporter,
) -> Result<SizeTree, VizError> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;

    let mut pairs = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        // raw access reads the header only, so unsupported compression methods still list
        let member = archive.by_index_raw(i)?;
        let size = if compressed {
            member.compressed_size()
        } else {
            member.size()
        };
        progress.report(member.name());
        pairs.push((path_split(member.name(), ""), clamp(size)));
    }

    log::debug!("read {} zip members from {:?}", pairs.len(), path);
    SizeTree::from_path_size_pairs(pairs, path, SizeMode::LeafExclusive)
}

/// Compression wrapped around a tar stream, told apart by its leading magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compression {
    None,
    Gzip,
    Bzip2,
}

impl Compression {
    fn sniff(head: &[u8]) -> Self {
        if head.starts_with(&[0x1f, 0x8b]) {
            Compression::Gzip
        } else if head.starts_with(b"BZh") {
            Compression::Bzip2
        } else {
            Compression::None
        }
    }
}

/// Builds a size tree from the members of the tar archive at `path`.
///
/// Plain, gzip and bzip2 compressed archives are accepted whatever the file is named.
pub fn tree_from_tar(path: &str, progress: &ProgressReporter) -> Result<SizeTree, VizError> {
    let mut reader = BufReader::new(File::open(path)?);
    let compression = Compression::sniff(reader.fill_buf()?);
    log::debug!("reading {:?} as {:?} compressed tar", path, compression);

    let decoder: Box<dyn Read> = match compression {
        Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
        Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
        Compression::None => Box::new(reader),
    };

    let mut archive = tar::Archive::new(decoder);
    let mut pairs = Vec::new();
    for entry in archive.entries()? {
        let entry = entry?;
        let name = entry.path()?.to_string_lossy().into_owned();
        progress.report(&name);
        pairs.push((path_split(&name, ""), clamp(entry.size())));
    }

    log::debug!("read {} tar members from {:?}", pairs.len(), path);
    SizeTree::from_path_size_pairs(pairs, path, SizeMode::LeafExclusive)
}

fn clamp(size: u64) -> i64 {
    i64::try_from(size).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(dir: &TempDir) -> String {
        let path = dir.path().join("bundle.zip");
        let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        writer.add_directory("docs/", options).unwrap();
        writer.start_file("docs/zeros.bin", options).unwrap();
        writer.write_all(&[0u8; 20_000]).unwrap();
        writer.start_file("docs/small.txt", options).unwrap();
        writer.write_all(b"hello").unwrap();
        writer.start_file("top.txt", options).unwrap();
        writer.write_all(&[b'x'; 3000]).unwrap();
        writer.finish().unwrap();
        path.to_string_lossy().into_owned()
    }

    fn append(builder: &mut tar::Builder<impl Write>, name: &str, data: &[u8]) {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, name, data).unwrap();
    }

    #[test]
    fn test_zip_uncompressed_sizes() {
        let dir = TempDir::new().unwrap();
        let path = write_zip(&dir);
        let tree = tree_from_zip(&path, false, &ProgressReporter::hidden()).unwrap();

        assert_eq!(tree.name, path);
        assert_eq!(tree.size, 23_005);
        assert_eq!(tree.children["docs"].size, 20_005);
        assert_eq!(tree.children["docs"].children["zeros.bin"].size, 20_000);
        assert_eq!(tree.children["top.txt"].size, 3000);
    }

    #[test]
    fn test_zip_compressed_sizes_are_smaller() {
        let dir = TempDir::new().unwrap();
        let path = write_zip(&dir);
        let tree = tree_from_zip(&path, true, &ProgressReporter::hidden()).unwrap();

        let zeros = tree.children["docs"].children["zeros.bin"].size;
        assert!(zeros > 0 && zeros < 20_000);
        assert!(tree.size < 23_005);
    }

    #[test]
    fn test_not_a_zip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.zip");
        std::fs::write(&path, b"definitely not a zip").unwrap();
        let err = tree_from_zip(&path.to_string_lossy(), true, &ProgressReporter::hidden())
            .unwrap_err();
        assert!(matches!(err, VizError::Zip(_)));
    }

    #[test]
    fn test_plain_tar() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle.tar");
        let mut builder = tar::Builder::new(File::create(&path).unwrap());
        append(&mut builder, "src/lib.rs", &[b'a'; 700]);
        append(&mut builder, "src/main.rs", &[b'b'; 300]);
        append(&mut builder, "README", &[b'c'; 50]);
        builder.finish().unwrap();

        let path = path.to_string_lossy().into_owned();
        let tree = tree_from_tar(&path, &ProgressReporter::hidden()).unwrap();
        assert_eq!(tree.size, 1050);
        assert_eq!(tree.children["src"].size, 1000);
        assert_eq!(tree.children["src"].children["lib.rs"].size, 700);
        assert_eq!(tree.children["README"].size, 50);
    }

    #[test]
    fn test_gzipped_tar_without_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle");
        let encoder = flate2::write::GzEncoder::new(
            File::create(&path).unwrap(),
            flate2::Compression::default(),
        );
        let mut builder = tar::Builder::new(encoder);
        append(&mut builder, "a/b/c.txt", &[0u8; 1234]);
        builder.into_inner().unwrap().finish().unwrap();

        let tree = tree_from_tar(&path.to_string_lossy(), &ProgressReporter::hidden()).unwrap();
        assert_eq!(tree.size, 1234);
        assert_eq!(tree.children["a"].children["b"].children["c.txt"].size, 1234);
    }

    #[test]
    fn test_archive_detection_by_extension() {
        let dir = TempDir::new().unwrap();
        for name in ["x.ZIP", "y.tar.gz", "z.tgz", "w.tar.bz2", "plain.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let at = |name: &str| dir.path().join(name).to_string_lossy().into_owned();

        assert!(looks_like_zip(&at("x.ZIP")));
        assert!(!looks_like_zip(&at("y.tar.gz")));
        assert!(looks_like_tar(&at("y.tar.gz")));
        assert!(looks_like_tar(&at("z.tgz")));
        assert!(looks_like_tar(&at("w.tar.bz2")));
        assert!(!looks_like_tar(&at("plain.txt")));
        // directories are never archives, whatever their name
        std::fs::create_dir(dir.path().join("dir.zip")).unwrap();
        assert!(!looks_like_zip(&at("dir.zip")));
    }

    #[test]
    fn test_sniff_compression() {
        assert_eq!(Compression::sniff(&[0x1f, 0x8b, 8]), Compression::Gzip);
        assert_eq!(Compression::sniff(b"BZh91AY"), Compression::Bzip2);
        assert_eq!(Compression::sniff(b"ustar"), Compression::None);
        assert_eq!(Compression::sniff(b""), Compression::None);
    }
}
