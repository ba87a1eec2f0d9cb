//! Output sample encoding: each complex sample is written as two 2-byte
//! big-endian signed integers, real part first.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Destination for quantized I/Q codes
pub trait SampleSink {
    fn write_sample(&mut self, i: i16, q: i16) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SampleSink for Vec<(i16, i16)> {
    fn write_sample(&mut self, i: i16, q: i16) -> io::Result<()> {
        self.push((i, q));
        Ok(())
    }
}

pub struct IqWriter<W: Write> {
    writer: W,
    samples: usize,
}

impl<W: Write> IqWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, samples: 0 }
    }

    pub fn samples_written(&self) -> usize {
        self.samples
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SampleSink for IqWriter<W> {
    fn write_sample(&mut self, i: i16, q: i16) -> io::Result<()> {
        self.writer.write_i16::<BigEndian>(i)?;
        self.writer.write_i16::<BigEndian>(q)?;
        self.samples += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Reads back samples in the output encoding; a trailing partial sample is ignored.
pub fn read_samples<R: Read>(mut reader: R) -> io::Result<Vec<(i16, i16)>> {
    let mut samples = Vec::new();
    loop {
        let i = match reader.read_i16::<BigEndian>() {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        };
        let q = match reader.read_i16::<BigEndian>() {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        };
        samples.push((i, q));
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_real_then_imag() {
        let mut writer = IqWriter::new(Vec::new());
        writer.write_sample(32767, -32768).unwrap();
        writer.write_sample(1, -2).unwrap();

        assert_eq!(writer.samples_written(), 2);
        assert_eq!(
            writer.into_inner(),
            vec![0x7f, 0xff, 0x80, 0x00, 0x00, 0x01, 0xff, 0xfe]
        );
    }

    #[test]
    fn test_read_ignores_partial_sample() {
        let bytes = [0x00, 0x05, 0xff, 0xfb, 0x12];
        let samples = read_samples(&bytes[..]).unwrap();
        assert_eq!(samples, vec![(5, -5)]);
    }
}
