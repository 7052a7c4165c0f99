use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};

use log::{debug, info};

use meridian_common::{
    serializer::{ReaderError, Serializer},
    snapshot::{SnapshotMetadata, SnapshotRecord},
    store::StoreView,
};

use crate::error::{GenesisError, IntegrityError};

// Upper bound on a single framed payload. The largest legitimate record
// is the validator pool; anything past this is a corrupt length prefix,
// refused before allocation.
const MAX_FRAME_SIZE: u64 = 1 << 30;

/// Streaming, single-pass snapshot writer.
///
/// Every record is framed as an 8-byte little-endian length followed by
/// the canonical payload, and flushed before the next record begins.
/// Memory stays bounded for arbitrarily large state, and a truncated file
/// is always detectable by the absent End sentinel.
pub struct SnapshotWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(inner: W) -> Self {
        SnapshotWriter {
            writer: BufWriter::new(inner),
        }
    }

    fn write_frame(&mut self, payload: &[u8]) -> Result<(), GenesisError> {
        self.writer.write_all(&(payload.len() as u64).to_le_bytes())?;
        self.writer.write_all(payload)?;
        self.writer.flush()?;
        Ok(())
    }

    /// The anchor metadata is always the first record of the file.
    pub fn write_metadata(&mut self, metadata: &SnapshotMetadata) -> Result<(), GenesisError> {
        self.write_frame(&metadata.to_bytes())
    }

    /// Write the full store content between Start and End sentinels, one
    /// record per entry in the store's deterministic traversal order.
    pub fn write_store(&mut self, sv: &StoreView) -> Result<(), GenesisError> {
        let height = sv.height();
        self.write_frame(&SnapshotRecord::start_marker(height).to_bytes())?;

        let mut written = 0usize;
        for (key, value) in sv.iter() {
            let record = SnapshotRecord::new(key.to_vec(), value.to_vec());
            self.write_frame(&record.to_bytes())?;
            written += 1;
        }

        self.write_frame(&SnapshotRecord::end_marker(height).to_bytes())?;
        debug!("wrote {} state records at height {}", written, height);
        Ok(())
    }
}

/// Frame-by-frame reader over a snapshot file.
pub struct SnapshotReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> SnapshotReader<R> {
    pub fn new(inner: R) -> Self {
        SnapshotReader {
            reader: BufReader::new(inner),
        }
    }

    // None at a clean end of file; an error if the file stops inside a
    // frame.
    fn read_frame(&mut self) -> Result<Option<Vec<u8>>, GenesisError> {
        let mut len_bytes = [0u8; 8];
        match self.reader.read_exact(&mut len_bytes) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(err) => return Err(err.into()),
        }

        let len = u64::from_le_bytes(len_bytes);
        if len > MAX_FRAME_SIZE {
            return Err(ReaderError::InvalidSize(len as usize).into());
        }

        let mut payload = vec![0u8; len as usize];
        self.reader.read_exact(&mut payload)?;
        Ok(Some(payload))
    }

    pub fn read_metadata(&mut self) -> Result<SnapshotMetadata, GenesisError> {
        let payload = self
            .read_frame()?
            .ok_or(IntegrityError::TruncatedSnapshot)?;
        Ok(SnapshotMetadata::from_bytes(&payload)?)
    }

    pub fn read_record(&mut self) -> Result<Option<SnapshotRecord>, GenesisError> {
        match self.read_frame()? {
            Some(payload) => Ok(Some(SnapshotRecord::from_bytes(&payload)?)),
            None => Ok(None),
        }
    }
}

/// Replay the state section of a snapshot back into a fresh store view.
///
/// Expects the reader to be positioned after the metadata record. The
/// Start sentinel fixes the view's height; every entry is inserted raw;
/// the End sentinel must appear and carry the same height, otherwise the
/// file is truncated or corrupt.
pub fn replay_store<R: Read>(reader: &mut SnapshotReader<R>) -> Result<StoreView, GenesisError> {
    let start = reader
        .read_record()?
        .ok_or(IntegrityError::TruncatedSnapshot)?;
    let start_height = start
        .marker_height()
        .filter(|_| start.is_start_marker())
        .ok_or(IntegrityError::MissingStartMarker)?;

    let mut sv = StoreView::new(start_height);
    loop {
        let record = reader
            .read_record()?
            .ok_or(IntegrityError::TruncatedSnapshot)?;

        if record.is_end_marker() {
            let end_height = record
                .marker_height()
                .ok_or(IntegrityError::TruncatedSnapshot)?;
            if end_height != start_height {
                return Err(IntegrityError::MarkerHeightMismatch {
                    start: start_height,
                    end: end_height,
                }
                .into());
            }
            break;
        }
        sv.insert_raw(record.key, record.value);
    }

    info!(
        "replayed {} state records at height {}",
        sv.len(),
        sv.height()
    );
    Ok(sv)
}
