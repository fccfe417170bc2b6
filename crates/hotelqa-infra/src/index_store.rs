//! Durable index store.
//!
//! Two files live side by side in `{data_dir}/index/`:
//!
//! - `booking_index.bin`: the flat index in a small little-endian container
//!   (`HQIX` magic, u32 version, u64 dimension, u64 count, then `count *
//!   dimension` f32 values, row-major).
//! - `booking_embeddings.npy`: the raw embedding matrix as NPY v1.0,
//!   `<f4`, C order, shape `(count, dimension)`, loadable with `numpy.load`.
//!
//! Either file alone is enough to restore an index that returns identical
//! search results. Both files are written to temporary siblings first and
//! only renamed into place once both writes succeed.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use hotelqa_core::index::{BuiltIndex, FlatL2Index};
use hotelqa_types::error::IndexError;

pub const INDEX_FILE: &str = "booking_index.bin";
pub const EMBEDDINGS_FILE: &str = "booking_embeddings.npy";

const INDEX_MAGIC: &[u8; 4] = b"HQIX";
const INDEX_VERSION: u32 = 1;

const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";
const NPY_ALIGN: usize = 64;

/// Reads and writes the persisted index files in one directory.
#[derive(Debug, Clone)]
pub struct IndexStore {
    dir: PathBuf,
}

impl IndexStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    pub fn embeddings_path(&self) -> PathBuf {
        self.dir.join(EMBEDDINGS_FILE)
    }

    /// Whether a persisted index is present.
    pub fn exists(&self) -> bool {
        self.index_path().is_file()
    }

    /// Persist both the index and the embedding matrix.
    pub fn save(&self, built: &BuiltIndex) -> Result<(), IndexError> {
        std::fs::create_dir_all(&self.dir)?;

        let index_tmp = temp_path(&self.index_path());
        let embeddings_tmp = temp_path(&self.embeddings_path());

        let written = write_file(&index_tmp, |w| write_index(w, &built.index)).and_then(|()| {
            write_file(&embeddings_tmp, |w| {
                write_npy(w, built.index.dimension(), &built.embeddings)
            })
        });
        if let Err(e) = written {
            discard(&index_tmp);
            discard(&embeddings_tmp);
            return Err(e);
        }

        std::fs::rename(&embeddings_tmp, self.embeddings_path())?;
        std::fs::rename(&index_tmp, self.index_path())?;

        tracing::info!(
            dir = %self.dir.display(),
            vectors = built.index.len(),
            "index saved"
        );
        Ok(())
    }

    /// Load the index from `booking_index.bin`.
    pub fn load_index(&self) -> Result<FlatL2Index, IndexError> {
        let file = File::open(self.index_path())?;
        read_index(&mut BufReader::new(file))
    }

    /// Load the embedding matrix from `booking_embeddings.npy`.
    pub fn load_embeddings(&self) -> Result<Matrix, IndexError> {
        let file = File::open(self.embeddings_path())?;
        read_npy(&mut BufReader::new(file))
    }

    /// Rebuild the index from the embedding matrix alone.
    pub fn rebuild_from_embeddings(&self) -> Result<FlatL2Index, IndexError> {
        let matrix = self.load_embeddings()?;
        FlatL2Index::from_raw(matrix.cols, matrix.data)
    }
}

/// A dense row-major f32 matrix as stored in NPY.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f32>,
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_file<F>(path: &Path, write: F) -> Result<(), IndexError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), IndexError>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

fn discard(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove temporary file");
        }
    }
}

/// Serialize `index` in the `HQIX` container format.
pub fn write_index<W: Write>(w: &mut W, index: &FlatL2Index) -> Result<(), IndexError> {
    w.write_all(INDEX_MAGIC)?;
    w.write_all(&INDEX_VERSION.to_le_bytes())?;
    w.write_all(&(index.dimension() as u64).to_le_bytes())?;
    w.write_all(&(index.len() as u64).to_le_bytes())?;
    write_f32s(w, index.as_slice())?;
    Ok(())
}

/// Deserialize an index written by [`write_index`].
pub fn read_index<R: Read>(r: &mut R) -> Result<FlatL2Index, IndexError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if &magic != INDEX_MAGIC {
        return Err(IndexError::Corrupt("not an index file (bad magic)".to_string()));
    }

    let version = read_u32(r)?;
    if version != INDEX_VERSION {
        return Err(IndexError::Corrupt(format!(
            "unsupported index version {version}"
        )));
    }

    let dimension = to_usize(read_u64(r)?)?;
    let count = to_usize(read_u64(r)?)?;
    let data = read_f32s(r, count, dimension)?;
    FlatL2Index::from_raw(dimension, data)
}

/// Write `rows` as an NPY v1.0 `<f4` matrix of shape `(rows.len(), dimension)`.
pub fn write_npy<W: Write>(w: &mut W, dimension: usize, rows: &[Vec<f32>]) -> Result<(), IndexError> {
    let mut header = format!(
        "{{'descr': '<f4', 'fortran_order': False, 'shape': ({}, {dimension}), }}",
        rows.len()
    );
    // Pad with spaces so the data starts on an aligned offset; the header
    // always ends in a newline.
    let preamble = NPY_MAGIC.len() + 2 + 2;
    let unpadded = preamble + header.len() + 1;
    let padding = (NPY_ALIGN - unpadded % NPY_ALIGN) % NPY_ALIGN;
    header.extend(std::iter::repeat_n(' ', padding));
    header.push('\n');

    let header_len = u16::try_from(header.len())
        .map_err(|_| IndexError::Corrupt("NPY header too long".to_string()))?;

    w.write_all(NPY_MAGIC)?;
    w.write_all(&[1, 0])?;
    w.write_all(&header_len.to_le_bytes())?;
    w.write_all(header.as_bytes())?;

    for (position, row) in rows.iter().enumerate() {
        if row.len() != dimension {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: row.len(),
                position,
            });
        }
        write_f32s(w, row)?;
    }
    Ok(())
}

/// Read a 2-D little-endian f32 C-order NPY matrix (format versions 1-3).
pub fn read_npy<R: Read>(r: &mut R) -> Result<Matrix, IndexError> {
    let mut magic = [0u8; 6];
    r.read_exact(&mut magic)?;
    if &magic != NPY_MAGIC {
        return Err(IndexError::Corrupt("not an NPY file (bad magic)".to_string()));
    }

    let mut version = [0u8; 2];
    r.read_exact(&mut version)?;
    let header_len = match version[0] {
        1 => {
            let mut buf = [0u8; 2];
            r.read_exact(&mut buf)?;
            u16::from_le_bytes(buf) as usize
        }
        2 | 3 => to_usize(u64::from(read_u32(r)?))?,
        major => {
            return Err(IndexError::Corrupt(format!(
                "unsupported NPY version {major}.{}",
                version[1]
            )));
        }
    };

    let mut header = vec![0u8; header_len];
    r.read_exact(&mut header)?;
    let header = String::from_utf8(header)
        .map_err(|_| IndexError::Corrupt("NPY header is not valid text".to_string()))?;

    let (rows, cols) = parse_npy_header(&header)?;
    let data = read_f32s(r, rows, cols)?;
    Ok(Matrix { rows, cols, data })
}

/// Validate the header dict and extract a 2-D shape.
fn parse_npy_header(header: &str) -> Result<(usize, usize), IndexError> {
    let descr = header_value(header, "descr")
        .ok_or_else(|| IndexError::Corrupt("NPY header has no descr".to_string()))?;
    if !descr.trim_start().starts_with("'<f4'") {
        return Err(IndexError::Corrupt(format!(
            "unsupported NPY dtype {}",
            descr.split(',').next().unwrap_or(descr).trim()
        )));
    }

    let fortran = header_value(header, "fortran_order")
        .ok_or_else(|| IndexError::Corrupt("NPY header has no fortran_order".to_string()))?;
    if !fortran.trim_start().starts_with("False") {
        return Err(IndexError::Corrupt("Fortran-ordered NPY is not supported".to_string()));
    }

    let shape = header_value(header, "shape")
        .ok_or_else(|| IndexError::Corrupt("NPY header has no shape".to_string()))?;
    let open = shape
        .find('(')
        .ok_or_else(|| IndexError::Corrupt("malformed NPY shape".to_string()))?;
    let tuple = &shape[open + 1..];
    let close = tuple
        .find(')')
        .ok_or_else(|| IndexError::Corrupt("malformed NPY shape".to_string()))?;

    let dims = tuple[..close]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| IndexError::Corrupt(format!("invalid NPY dimension '{s}'")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match dims.as_slice() {
        [rows, cols] => Ok((*rows, *cols)),
        other => Err(IndexError::Corrupt(format!(
            "expected a 2-D matrix, found {} dimensions",
            other.len()
        ))),
    }
}

/// The text following `'key':` in an NPY header dict.
fn header_value<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("'{key}':");
    let start = header.find(&needle)? + needle.len();
    Some(&header[start..])
}

fn write_f32s<W: Write>(w: &mut W, values: &[f32]) -> io::Result<()> {
    for value in values {
        w.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

fn read_f32s<R: Read>(r: &mut R, rows: usize, cols: usize) -> Result<Vec<f32>, IndexError> {
    let expected = rows
        .checked_mul(cols)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| IndexError::Corrupt(format!("shape ({rows}, {cols}) is too large")))?;

    let mut bytes = Vec::new();
    r.take(expected as u64).read_to_end(&mut bytes)?;
    if bytes.len() != expected {
        return Err(IndexError::Corrupt(format!(
            "truncated data: expected {expected} bytes, found {}",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64<R: Read>(r: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn to_usize(value: u64) -> Result<usize, IndexError> {
    usize::try_from(value).map_err(|_| IndexError::Corrupt(format!("size {value} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npy_with_header(header: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(NPY_MAGIC);
        buf.extend_from_slice(&[1, 0]);
        buf.extend_from_slice(&(header.len() as u16).to_le_bytes());
        buf.extend_from_slice(header.as_bytes());
        buf
    }

    fn rows(matrix: &Matrix) -> Vec<Vec<f32>> {
        matrix.data.chunks_exact(matrix.cols).map(<[f32]>::to_vec).collect()
    }

    fn sample() -> BuiltIndex {
        let embeddings = vec![
            vec![0.0, 0.5, 1.0],
            vec![2.0, -1.0, 0.25],
            vec![0.1, 0.2, 0.3],
            vec![-3.5, 4.0, 9.75],
        ];
        let index = FlatL2Index::build(3, &embeddings).unwrap();
        BuiltIndex { embeddings, index }
    }

    #[test]
    fn test_index_roundtrip_preserves_search() {
        let built = sample();
        let mut buf = Vec::new();
        write_index(&mut buf, &built.index).unwrap();

        let restored = read_index(&mut buf.as_slice()).unwrap();
        assert_eq!(restored, built.index);

        let query = [0.2, 0.1, 0.4];
        assert_eq!(
            restored.search(&query, 4).unwrap(),
            built.index.search(&query, 4).unwrap()
        );
    }

    #[test]
    fn test_npy_header_is_aligned() {
        let built = sample();
        let mut buf = Vec::new();
        write_npy(&mut buf, 3, &built.embeddings).unwrap();

        assert_eq!(&buf[..6], NPY_MAGIC);
        assert_eq!(buf[6], 1);
        let header_len = u16::from_le_bytes([buf[8], buf[9]]) as usize;
        assert_eq!((10 + header_len) % NPY_ALIGN, 0);
        assert_eq!(buf[10 + header_len - 1], b'\n');
        let header = std::str::from_utf8(&buf[10..10 + header_len]).unwrap();
        assert!(header.contains("'shape': (4, 3)"));
        assert_eq!(buf.len(), 10 + header_len + 4 * 3 * 4);
    }

    #[test]
    fn test_npy_roundtrip_rebuilds_same_index() {
        let built = sample();
        let mut buf = Vec::new();
        write_npy(&mut buf, 3, &built.embeddings).unwrap();

        let matrix = read_npy(&mut buf.as_slice()).unwrap();
        assert_eq!(matrix.rows, 4);
        assert_eq!(matrix.cols, 3);
        assert_eq!(rows(&matrix), built.embeddings);

        let rebuilt = FlatL2Index::build(matrix.cols, &rows(&matrix)).unwrap();
        assert_eq!(rebuilt, built.index);
    }

    #[test]
    fn test_read_npy_rejects_other_dtypes() {
        let mut buf =
            npy_with_header("{'descr': '<f8', 'fortran_order': False, 'shape': (1, 1), }");
        buf.extend_from_slice(&[0u8; 8]);

        assert!(matches!(
            read_npy(&mut buf.as_slice()),
            Err(IndexError::Corrupt(_))
        ));
    }

    #[test]
    fn test_read_index_rejects_truncated_data() {
        let built = sample();
        let mut buf = Vec::new();
        write_index(&mut buf, &built.index).unwrap();
        buf.truncate(buf.len() - 3);

        assert!(matches!(
            read_index(&mut buf.as_slice()),
            Err(IndexError::Corrupt(_))
        ));
    }

    #[test]
    fn test_read_index_rejects_bad_magic() {
        let buf = b"NOPE\x01\x00\x00\x00".to_vec();
        assert!(matches!(
            read_index(&mut buf.as_slice()),
            Err(IndexError::Corrupt(_))
        ));
    }

    #[test]
    fn test_store_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("index"));
        assert!(!store.exists());

        let built = sample();
        store.save(&built).unwrap();
        assert!(store.exists());
        assert!(store.embeddings_path().is_file());

        assert_eq!(store.load_index().unwrap(), built.index);
        assert_eq!(store.rebuild_from_embeddings().unwrap(), built.index);
    }

    #[test]
    fn test_empty_matrix_roundtrip() {
        let mut buf = Vec::new();
        write_npy(&mut buf, 384, &[]).unwrap();
        let matrix = read_npy(&mut buf.as_slice()).unwrap();
        assert_eq!((matrix.rows, matrix.cols), (0, 384));
        assert!(matrix.data.is_empty());
    }

    #[test]
    fn test_read_npy_rejects_misordered_shape() {
        for header in [
            "{'descr': '<f4', 'fortran_order': False, 'shape': 3), (1, }",
            "{'descr': '<f4', 'fortran_order': False, 'shape': (3, 1 }",
            "{'descr': '<f4', 'fortran_order': False, 'shape': 3, }",
        ] {
            let buf = npy_with_header(header);
            assert!(
                matches!(read_npy(&mut buf.as_slice()), Err(IndexError::Corrupt(_))),
                "header {header:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_failed_save_keeps_previous_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("index"));
        let built = sample();
        store.save(&built).unwrap();

        // A row shorter than the index dimension fails the NPY write.
        let mut broken = sample();
        broken.embeddings[2].pop();
        let other = FlatL2Index::build(3, &[vec![9.0, 9.0, 9.0]]).unwrap();
        broken.index = other;
        assert!(matches!(
            store.save(&broken),
            Err(IndexError::DimensionMismatch { .. })
        ));

        assert_eq!(store.load_index().unwrap(), built.index);
        assert_eq!(store.rebuild_from_embeddings().unwrap(), built.index);
        let leftovers: Vec<_> = std::fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temporary files left: {leftovers:?}");
    }
}
