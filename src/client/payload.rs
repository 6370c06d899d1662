//! The constant request payload.
//!
//! The bytes never change; what opens and closes per cycle is a read
//! session over them. Opening a session that is already open is the one
//! precondition failure on the client side.

use std::io;
use std::sync::Arc;

use futures_util::stream::{self, Stream};
use thiserror::Error;

use crate::client::progress::{CycleObserver, ProgressKind};

/// URL-encoded form fields posted by every cycle.
pub const FORM_PAYLOAD: &[u8] = b"animal=buffalo&plant=fern&fungus=mushroom";

/// Media type of [`FORM_PAYLOAD`].
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("payload is already open for reading")]
    AlreadyOpen,
}

#[derive(Debug)]
pub struct Payload {
    bytes: &'static [u8],
    open: bool,
}

impl Payload {
    pub fn new(bytes: &'static [u8]) -> Self {
        Self { bytes, open: false }
    }

    pub fn form() -> Self {
        Self::new(FORM_PAYLOAD)
    }

    pub fn bytes(&self) -> &'static [u8] {
        self.bytes
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Start a read session.
    pub fn open(&mut self) -> Result<PayloadBody, PayloadError> {
        if self.open {
            return Err(PayloadError::AlreadyOpen);
        }
        self.open = true;
        Ok(PayloadBody { bytes: self.bytes })
    }

    /// End the read session. The bytes stay available for the next one.
    pub fn close(&mut self) {
        self.open = false;
    }
}

/// The payload of one open read session.
#[derive(Debug, Clone, Copy)]
pub struct PayloadBody {
    bytes: &'static [u8],
}

impl PayloadBody {
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Stream the payload in `chunk_bytes` pieces, reporting upload
    /// progress to `observer` as each piece is handed to the transport.
    pub fn into_stream(
        self,
        chunk_bytes: usize,
        observer: Arc<dyn CycleObserver>,
    ) -> impl Stream<Item = Result<&'static [u8], io::Error>> + Send + Sync + 'static {
        let total = self.len();
        let chunks = self.bytes.chunks(chunk_bytes.max(1));
        stream::iter(chunks.scan(0u64, move |sent, chunk| {
            *sent += chunk.len() as u64;
            observer.on_progress(ProgressKind::Upload, *sent, Some(total));
            Some(Ok::<_, io::Error>(chunk))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::progress::CycleOutcome;
    use futures_util::StreamExt;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Uploads(Mutex<Vec<(u64, Option<u64>)>>);

    impl CycleObserver for Uploads {
        fn on_progress(&self, kind: ProgressKind, transferred: u64, total: Option<u64>) {
            assert_eq!(kind, ProgressKind::Upload);
            self.0.lock().unwrap().push((transferred, total));
        }

        fn on_completion(&self, _cycle: u64, _outcome: &CycleOutcome) {}
    }

    #[test]
    fn form_payload_length() {
        let payload = Payload::form();
        assert_eq!(payload.len(), 41);
        assert_eq!(payload.bytes(), b"animal=buffalo&plant=fern&fungus=mushroom");
    }

    #[test]
    fn open_twice_fails_until_closed() {
        let mut payload = Payload::form();
        let body = payload.open().unwrap();
        assert_eq!(body.len(), 41);
        assert!(payload.is_open());
        assert_eq!(payload.open().unwrap_err(), PayloadError::AlreadyOpen);

        payload.close();
        assert!(!payload.is_open());
        assert!(payload.open().is_ok());
    }

    #[tokio::test]
    async fn stream_reports_upload_progress() {
        let mut payload = Payload::form();
        let uploads = Arc::new(Uploads::default());
        let chunks: Vec<_> = payload
            .open()
            .unwrap()
            .into_stream(16, uploads.clone())
            .collect()
            .await;

        let sent: Vec<u8> = chunks
            .into_iter()
            .flat_map(|c| c.unwrap().iter().copied())
            .collect();
        assert_eq!(sent, FORM_PAYLOAD);
        assert_eq!(
            *uploads.0.lock().unwrap(),
            vec![(16, Some(41)), (32, Some(41)), (41, Some(41))]
        );
    }
}
