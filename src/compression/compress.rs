use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};

use log::{info, warn};

use super::compress_block::BlockCompressor;
use crate::bitstream::bitwriter::BitWriter;
use crate::tools::cli::BzOpts;
use crate::tools::crc::do_stream_crc;

/// First half of the stream footer magic, "sqrt(pi)".
const STREAM_FOOTER_MARKER_1: u32 = 0x17_7245;
/// Second half of the stream footer magic.
const STREAM_FOOTER_MARKER_2: u32 = 0x38_5090;

/// Writes a complete bzip2 stream: the `BZh` header, one compressed block
/// per 100-900k of RLE1 data, and the footer with the combined CRC.
///
/// Blocks are independent; this type only sequences them onto one sink and
/// folds their checksums together.
pub struct StreamCompressor<W: Write> {
    bw: BitWriter<W>,
    block: BlockCompressor,
    block_size: usize,
    stream_crc: u32,
}

impl<W: Write> StreamCompressor<W> {
    /// Open a stream at compression `level` (1..=9, 100k..900k blocks) and
    /// write the stream header.
    pub fn new(writer: W, level: usize) -> io::Result<Self> {
        assert!((1..=9).contains(&level), "compression level must be 1..=9");
        let block_size = level * 100_000;

        let mut bw = BitWriter::new(writer);
        for &byte in b"BZh" {
            bw.write_bits(8, u32::from(byte))?;
        }
        bw.write_bits(8, u32::from(b'0' + level as u8))?;

        Ok(Self {
            bw,
            block: BlockCompressor::new(block_size),
            block_size,
            stream_crc: 0,
        })
    }

    /// Feed data into the stream, closing and reopening blocks as they fill.
    pub fn write(&mut self, mut data: &[u8]) -> io::Result<()> {
        while !data.is_empty() {
            let taken = self.block.write_bytes(data);
            data = &data[taken..];
            if !data.is_empty() {
                self.close_block()?;
            }
        }
        Ok(())
    }

    fn close_block(&mut self) -> io::Result<()> {
        if self.block.is_empty() {
            return Ok(());
        }
        let mut block = std::mem::replace(&mut self.block, BlockCompressor::new(self.block_size));
        block.close(&mut self.bw)?;
        self.stream_crc = do_stream_crc(self.stream_crc, block.crc());
        Ok(())
    }

    /// Close the last block, write the stream footer, pad to a byte
    /// boundary, and hand back the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.close_block()?;
        self.bw.write_bits(24, STREAM_FOOTER_MARKER_1)?;
        self.bw.write_bits(24, STREAM_FOOTER_MARKER_2)?;
        self.bw.write_u32(self.stream_crc)?;
        self.bw.flush()?;
        Ok(self.bw.into_inner())
    }
}

/// Compress every input file named in the options to `<name>.bz2`.
pub fn compress(opts: &BzOpts) -> io::Result<()> {
    for fname in &opts.files {
        let mut source = File::open(fname)?;

        let out_name = format!("{}.bz2", fname);
        if !opts.force_overwrite && std::path::Path::new(&out_name).exists() {
            warn!("{} exists; use --force to overwrite", out_name);
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", out_name),
            ));
        }
        let f_out = BufWriter::new(File::create(&out_name)?);

        let mut stream = StreamCompressor::new(f_out, opts.block_size)?;
        let mut buffer = vec![0u8; 1 << 16];
        let mut bytes_in = 0usize;
        loop {
            let n = source.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            bytes_in += n;
            stream.write(&buffer[..n])?;
        }
        let mut writer = stream.finish()?;
        writer.flush()?;

        let bytes_out = fs::metadata(&out_name)?.len();
        info!("{}: {} bytes in, {} bytes out", fname, bytes_in, bytes_out);

        if !opts.keep_input_files {
            fs::remove_file(fname)?;
        }
    }
    Ok(())
}
