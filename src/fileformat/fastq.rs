use std::fs::File;
use std::path::Path;

use seq_io::fastq::Reader as FastqReader;

use crate::runtime::Error;

///////////////////////////////
/// Open a FASTQ file; compression is detected from the content
pub fn open_fastq(path: &Path) -> anyhow::Result<FastqReader<Box<dyn std::io::Read>>> {
    let opened_handle = File::open(path).map_err(|_| Error::file_not_found(path))?;

    let (reader, compression) = niffler::get_reader(Box::new(opened_handle))
        .map_err(|e| Error::file_not_valid(path, Some(e.to_string())))?;

    log::debug!(
        "Opened file {} with compression {:?}",
        path.display(),
        compression
    );
    Ok(FastqReader::new(reader))
}
