//! Response dispatch for a single netlink transaction.

use super::error::{Error, Result};
use super::message::{MessageIter, NlMsgError, NlMsgHdr, NlMsgType};

/// Where a transaction stands after the buffers fed so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing relevant seen yet.
    Awaiting,
    /// At least one data message was decoded.
    DataFlowing,
    /// Ended by `NLMSG_DONE` or a zero-status ACK.
    Done,
    /// Ended by a failing ACK or a malformed buffer.
    Failed,
}

impl State {
    /// Check if no further buffers should be fed.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Walks received buffers and classifies each message.
///
/// Data messages of the expected type go to the decoder. ACKs, errors and
/// `NLMSG_DONE` end the transaction. Messages with another sequence number
/// and types the dispatcher does not know are skipped.
#[derive(Debug)]
pub struct Dispatcher {
    seq: u32,
    expected: Option<u16>,
    state: State,
    decoded: usize,
    walked: usize,
}

impl Dispatcher {
    /// Dispatcher for the replies to request `seq`.
    ///
    /// `expected` is the data message type to decode, or `None` for
    /// requests answered by an ACK alone.
    pub fn new(seq: u32, expected: Option<u16>) -> Self {
        Self {
            seq,
            expected,
            state: State::Awaiting,
            decoded: 0,
            walked: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Number of data messages handed to the decoder.
    pub fn decoded(&self) -> usize {
        self.decoded
    }

    /// Number of messages walked, including any after the terminator.
    pub fn walked(&self) -> usize {
        self.walked
    }

    /// Walk every message in `buffer`.
    ///
    /// Messages after the one that ended the transaction are walked but not
    /// dispatched. A failing ACK moves to [`State::Failed`] and returns the
    /// kernel error. So does a decoder error or a message running past the
    /// buffer.
    pub fn feed<F>(&mut self, buffer: &[u8], mut decoder: F) -> Result<State>
    where
        F: FnMut(&NlMsgHdr, &[u8]) -> Result<()>,
    {
        if self.state.is_terminal() {
            tracing::trace!(state = ?self.state, "buffer after end of transaction ignored");
            return Ok(self.state);
        }

        for message in MessageIter::new(buffer) {
            let (header, payload) = match message {
                Ok(message) => message,
                Err(e) if self.state.is_terminal() => {
                    tracing::trace!(error = %e, "malformed bytes after end of transaction");
                    break;
                }
                Err(e) => {
                    self.state = State::Failed;
                    return Err(e);
                }
            };
            self.walked += 1;

            if self.state.is_terminal() {
                tracing::trace!(
                    msg_type = header.nlmsg_type,
                    "message after end of transaction"
                );
                continue;
            }

            if header.nlmsg_seq != self.seq {
                tracing::trace!(
                    seq = header.nlmsg_seq,
                    expected = self.seq,
                    "skipping message from another transaction"
                );
                continue;
            }

            match header.nlmsg_type {
                NlMsgType::DONE => {
                    tracing::debug!(decoded = self.decoded, "transaction done");
                    self.state = State::Done;
                }
                NlMsgType::ERROR => {
                    let status = NlMsgError::status(payload)
                        .inspect_err(|_| self.state = State::Failed)?;
                    if status != 0 {
                        tracing::debug!(status, "transaction failed");
                        self.state = State::Failed;
                        return Err(Error::from_errno(status));
                    }
                    tracing::debug!("transaction acknowledged");
                    self.state = State::Done;
                }
                t if Some(t) == self.expected => {
                    decoder(header, payload).inspect_err(|_| self.state = State::Failed)?;
                    self.decoded += 1;
                    self.state = State::DataFlowing;
                }
                t => {
                    tracing::trace!(msg_type = t, "skipping unknown message type");
                }
            }
        }

        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::fixtures;

    #[test]
    fn ack_then_done_in_one_buffer() {
        let mut data = fixtures::ack(7, 0);
        data.extend(fixtures::done(7));

        let mut dispatcher = Dispatcher::new(7, None);
        let state = dispatcher.feed(&data, |_, _| Ok(())).unwrap();
        assert_eq!(state, State::Done);
        assert_eq!(dispatcher.walked(), 2);
    }

    #[test]
    fn failing_ack_skips_decoder() {
        let mut data = fixtures::ack(7, -libc::EEXIST);
        data.extend(fixtures::new_route(7, 0x40, 2));

        let mut calls = 0;
        let mut dispatcher = Dispatcher::new(7, Some(NlMsgType::RTM_NEWROUTE));
        let err = dispatcher
            .feed(&data, |_, _| {
                calls += 1;
                Ok(())
            })
            .unwrap_err();

        assert_eq!(dispatcher.state(), State::Failed);
        assert!(err.is_already_exists());
        assert_eq!(calls, 0);
    }

    #[test]
    fn walks_all_data_messages() {
        let mut data = fixtures::new_route(3, 0x10, 1);
        data.extend(fixtures::new_route(3, 0x40, 2));

        let mut seen = Vec::new();
        let mut dispatcher = Dispatcher::new(3, Some(NlMsgType::RTM_NEWROUTE));
        let state = dispatcher
            .feed(&data, |_, payload| {
                seen.push(payload.to_vec());
                Ok(())
            })
            .unwrap();

        assert_eq!(state, State::DataFlowing);
        assert_eq!(seen.len(), 2);
        assert_eq!(dispatcher.decoded(), 2);

        let state = dispatcher.feed(&fixtures::done(3), |_, _| Ok(())).unwrap();
        assert_eq!(state, State::Done);
    }

    #[test]
    fn other_sequence_and_unknown_types_are_skipped() {
        let mut data = fixtures::new_route(99, 0x10, 1);
        data.extend(fixtures::message(5, 0x7777, &[0; 4]));
        data.extend(fixtures::ack(99, -libc::EPERM));
        data.extend(fixtures::done(5));

        let mut dispatcher = Dispatcher::new(5, Some(NlMsgType::RTM_NEWROUTE));
        let state = dispatcher
            .feed(&data, |_, _| panic!("nothing to decode"))
            .unwrap();
        assert_eq!(state, State::Done);
        assert_eq!(dispatcher.decoded(), 0);
    }

    #[test]
    fn nothing_dispatched_after_terminal_message() {
        let mut data = fixtures::done(1);
        data.extend(fixtures::new_route(1, 0x10, 1));

        let mut calls = 0;
        let mut dispatcher = Dispatcher::new(1, Some(NlMsgType::RTM_NEWROUTE));
        dispatcher
            .feed(&data, |_, _| {
                calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, 0);
        assert_eq!(dispatcher.walked(), 2);

        // terminal: later buffers are ignored
        let state = dispatcher
            .feed(&fixtures::new_route(1, 0x20, 1), |_, _| {
                calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(state, State::Done);
        assert_eq!(calls, 0);
        assert_eq!(dispatcher.walked(), 2);
    }

    #[test]
    fn bytes_after_terminal_message_are_not_an_error() {
        let mut data = fixtures::ack(8, 0);
        let partial = fixtures::new_route(8, 0x10, 1);
        data.extend_from_slice(&partial[..24]);

        let mut dispatcher = Dispatcher::new(8, None);
        let state = dispatcher.feed(&data, |_, _| Ok(())).unwrap();
        assert_eq!(state, State::Done);
        assert_eq!(dispatcher.walked(), 1);
    }

    #[test]
    fn straddling_message_fails() {
        let first = fixtures::new_route(4, 0x10, 1);
        let second = fixtures::new_route(4, 0x14, 1);
        let mut data = first.clone();
        data.extend_from_slice(&second[..second.len() / 2]);

        let mut dispatcher = Dispatcher::new(4, Some(NlMsgType::RTM_NEWROUTE));
        let err = dispatcher.feed(&data, |_, _| Ok(())).unwrap_err();
        assert!(matches!(err, Error::Truncated { .. }));
        assert_eq!(dispatcher.state(), State::Failed);
    }

    #[test]
    fn decoder_error_fails_transaction() {
        let data = fixtures::new_route(2, 0x10, 1);
        let mut dispatcher = Dispatcher::new(2, Some(NlMsgType::RTM_NEWROUTE));
        let result = dispatcher.feed(&data, |_, _| Err(Error::InvalidMessage("bad".into())));
        assert!(result.is_err());
        assert_eq!(dispatcher.state(), State::Failed);
    }
}
