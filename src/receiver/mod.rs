//! # Receiver Module
//!
//! Frame acquisition from the attached radio modem.
//!
//! This module handles:
//! - Opening the serial port to the radio modem
//! - Chunking the byte stream into fixed 26-byte payload frames
//!
//! The modem is assumed transparent: it forwards raw payloads back-to-back
//! with no extra framing, so frame recovery is plain fixed-length chunking.

mod serial;
pub use serial::RadioModem;

use bytes::BytesMut;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::bresser::protocol::MSG_BUF_SIZE;

/// Splits an async byte stream into fixed-length payload frames
///
/// Generic over the underlying reader so tests can drive it with mock
/// streams instead of a serial port.
pub struct FrameReader<R> {
    inner: R,
    buf: BytesMut,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(MSG_BUF_SIZE * 4),
        }
    }

    /// Read the next complete frame from the stream
    ///
    /// Returns `Ok(None)` on a clean end of stream at a frame boundary.
    /// An end of stream in the middle of a frame is an `UnexpectedEof`
    /// error, since the modem only ever emits whole payloads.
    pub async fn next_frame(&mut self) -> io::Result<Option<[u8; MSG_BUF_SIZE]>> {
        while self.buf.len() < MSG_BUF_SIZE {
            let n = self.inner.read_buf(&mut self.buf).await?;
            if n == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("stream ended mid-frame with {} bytes buffered", self.buf.len()),
                ));
            }
        }

        let bytes = self.buf.split_to(MSG_BUF_SIZE);
        let mut frame = [0u8; MSG_BUF_SIZE];
        frame.copy_from_slice(&bytes);
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_frame() {
        let data: Vec<u8> = (0..MSG_BUF_SIZE as u8).collect();
        let mock = tokio_test::io::Builder::new().read(&data).build();

        let mut reader = FrameReader::new(mock);
        let frame = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(&frame[..], &data[..]);
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_frame_split_across_reads() {
        let data: Vec<u8> = (0..MSG_BUF_SIZE as u8).collect();
        let mock = tokio_test::io::Builder::new()
            .read(&data[..10])
            .read(&data[10..20])
            .read(&data[20..])
            .build();

        let mut reader = FrameReader::new(mock);
        let frame = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(&frame[..], &data[..]);
    }

    #[tokio::test]
    async fn test_two_frames_in_one_read() {
        let mut data = vec![0x11u8; MSG_BUF_SIZE];
        data.extend(vec![0x22u8; MSG_BUF_SIZE]);
        let mock = tokio_test::io::Builder::new().read(&data).build();

        let mut reader = FrameReader::new(mock);
        let first = reader.next_frame().await.unwrap().unwrap();
        let second = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(first, [0x11u8; MSG_BUF_SIZE]);
        assert_eq!(second, [0x22u8; MSG_BUF_SIZE]);
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_eof_mid_frame() {
        let mock = tokio_test::io::Builder::new().read(&[0xAA; 10]).build();

        let mut reader = FrameReader::new(mock);
        let err = reader.next_frame().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let mock = tokio_test::io::Builder::new().build();

        let mut reader = FrameReader::new(mock);
        assert!(reader.next_frame().await.unwrap().is_none());
    }
}
