//! Sends a batch, bisecting any chunk the endpoint refuses as too large.
//!
//! Chunks are borrowed sub-slices of the caller's batch kept in a queue. A
//! chunk answered with 413, 504 or a transport timeout is split in half and
//! both halves go back to the front of the queue, first half first. Since
//! chunks always leave from the front, concatenating the decoded responses in
//! the order they arrive gives back the batch order.

use crate::codec::{self, RawResponse};
use crate::error::{Error, Exhausted, ProtocolFault, Result};
use crate::request::Request;
use crate::standardize::{standardize, StandardResponse};
use crate::transport::{Transport, TransportError, TransportOptions};
use std::collections::VecDeque;

const PAYLOAD_TOO_LARGE: u16 = 413;
const GATEWAY_TIMEOUT: u16 = 504;

pub struct Splitter<'a> {
    transport: &'a dyn Transport,
    endpoint: &'a url::Url,
    options: &'a TransportOptions,
}

impl<'a> Splitter<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        endpoint: &'a url::Url,
        options: &'a TransportOptions,
    ) -> Self {
        Self {
            transport,
            endpoint,
            options,
        }
    }

    pub async fn send(&self, batch: &[Request]) -> Result<Vec<StandardResponse>> {
        let mut queue = VecDeque::from([batch]);
        let mut decoded: Vec<Vec<RawResponse>> = Vec::new();

        while let Some(chunk) = queue.pop_front() {
            // an empty batch gets an empty answer without a round trip
            if chunk.is_empty() {
                continue;
            }

            let req_body = codec::encode_batch(chunk)?;

            log::debug!(
                "sending chunk of {} requests to {}",
                chunk.len(),
                self.endpoint
            );

            let exhausted = match self
                .transport
                .send(self.endpoint, req_body.clone(), self.options)
                .await
            {
                Ok(resp) if is_oversized(resp.status) => Exhausted::Response {
                    status: resp.status,
                    body: String::from_utf8_lossy(&resp.body).into_owned(),
                },
                Ok(resp) => {
                    let responses =
                        codec::decode(&resp.body, resp.status, self.endpoint, &req_body)?
                            .into_vec();

                    // responses are matched to requests by position
                    if responses.len() != chunk.len() {
                        log::error!(
                            "sent {} requests to {} but got {} responses",
                            chunk.len(),
                            self.endpoint,
                            responses.len()
                        );
                        return Err(Error::Protocol(ProtocolFault::ResponseCountMismatch {
                            sent: chunk.len(),
                            received: responses.len(),
                        }));
                    }

                    decoded.push(responses);
                    continue;
                }
                Err(TransportError::Timeout) => Exhausted::Timeout,
                Err(e) => return Err(Error::Transport(e)),
            };

            if chunk.len() == 1 {
                return Err(Error::SplitExhausted(exhausted));
            }

            let (first, second) = chunk.split_at(chunk.len() / 2);

            log::warn!(
                "chunk of {} requests rejected by {} ({}), retrying as {} + {}",
                chunk.len(),
                self.endpoint,
                exhausted,
                first.len(),
                second.len()
            );

            queue.push_front(second);
            queue.push_front(first);
        }

        decoded.into_iter().flatten().map(standardize).collect()
    }
}

fn is_oversized(status: u16) -> bool {
    status == PAYLOAD_TOO_LARGE || status == GATEWAY_TIMEOUT
}
