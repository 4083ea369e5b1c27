// src/reader/session.rs
use crate::error::{ErrorKind, Result, ZonarError};
use crate::packet::{AverageRecord, BurstRecord, DiveStart, PacketHeader};
use crate::raw_data::ByteCursor;
use crate::types::PacketType;
use log::{debug, warn};
use smallvec::SmallVec;
use std::fmt;

/// Where the session decoder stands in the packet stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Next read is a packet header
    AwaitHeader,
    DecodeStart,
    DecodeBurst,
    DecodeAverage,
    DecodeEnd,
    /// The last header announced a packet with no decoder; its body is skipped
    SkipUnknown,
    /// EOF marker read or buffer exhausted
    Eof,
    /// Decoding stopped on a fatal error
    Error,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Eof | SessionState::Error)
    }
}

/// Result of a single decoder step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// More to decode; carries the new position
    Continue(usize),
    Eof,
    Error(ErrorKind),
}

/// Event worth reporting that did not stop the decode, or the reason it stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Offset of the header or body the event refers to
    pub offset: usize,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A packet without a decoder was stepped over
    Skipped { packet_type: u8, byte_count: usize },
    /// End-of-dive packet
    DiveEnd,
    /// A further START packet; the first dive start stays in effect
    RepeatedDiveStart { dive_number: i16 },
    /// Decoding stopped here
    Stopped { kind: ErrorKind, message: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::Skipped { packet_type, byte_count } => write!(
                f,
                "offset {}: skipped {} bytes of packet type {:#04x}",
                self.offset, byte_count, packet_type
            ),
            DiagnosticKind::DiveEnd => write!(f, "offset {}: end of dive", self.offset),
            DiagnosticKind::RepeatedDiveStart { dive_number } => write!(
                f,
                "offset {}: ignored repeated start of dive {}",
                self.offset, dive_number
            ),
            DiagnosticKind::Stopped { message, .. } => {
                write!(f, "offset {}: decoding stopped: {}", self.offset, message)
            }
        }
    }
}

/// Records accumulated by one pass over a dive file
#[derive(Debug)]
pub struct SessionRecords {
    pub dive_start: Option<DiveStart>,
    pub bursts: Vec<BurstRecord>,
    pub averages: Vec<AverageRecord>,
    pub diagnostics: SmallVec<[Diagnostic; 4]>,
    /// `Eof` or `Error`
    pub state: SessionState,
    /// The error that stopped the decode, when `state` is `Error`
    pub error: Option<ZonarError>,
    /// Position reached in the buffer
    pub position: usize,
}

/// Single-pass packet decoder for one dive file
///
/// Each packet is a pad byte, an 11-byte header announcing the next body, and
/// the body itself. The decoder alternates between reading a header and
/// decoding the body it announced, appending records in stream order until
/// an EOF marker, the end of the buffer, or a fatal error.
///
/// Unknown packet types are skipped using the header's declared byte count.
/// Everything else that goes wrong (bad sync, truncation, data before the
/// dive start) ends the session, keeping what was decoded so far.
///
/// # Example
///
/// ```
/// use zonar_rs::reader::{DiveSessionDecoder, SessionState};
///
/// // A pad byte followed by a header announcing EOF
/// let data = [0u8, 1, 11, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0];
/// let records = DiveSessionDecoder::new(&data).run();
///
/// assert_eq!(records.state, SessionState::Eof);
/// assert!(records.bursts.is_empty());
/// ```
pub struct DiveSessionDecoder<'a> {
    data: &'a [u8],
    position: usize,
    state: SessionState,
    header: Option<PacketHeader>,
    dive_start: Option<DiveStart>,
    bursts: Vec<BurstRecord>,
    averages: Vec<AverageRecord>,
    burst_count: u32,
    average_count: u32,
    diagnostics: SmallVec<[Diagnostic; 4]>,
    error: Option<ZonarError>,
}

impl<'a> DiveSessionDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        DiveSessionDecoder {
            data,
            position: 0,
            state: SessionState::AwaitHeader,
            header: None,
            dive_start: None,
            bursts: Vec::new(),
            averages: Vec::new(),
            burst_count: 0,
            average_count: 0,
            diagnostics: SmallVec::new(),
            error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn burst_count(&self) -> u32 {
        self.burst_count
    }

    pub fn average_count(&self) -> u32 {
        self.average_count
    }

    /// Most recently decoded packet header
    pub fn last_header(&self) -> Option<&PacketHeader> {
        self.header.as_ref()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Advance by one state transition
    ///
    /// Once a terminal state is reached every further call returns the same
    /// terminal outcome.
    pub fn step(&mut self) -> DecodeOutcome {
        let result = match self.state {
            SessionState::Eof => return DecodeOutcome::Eof,
            SessionState::Error => {
                return match &self.error {
                    Some(err) => DecodeOutcome::Error(err.kind()),
                    None => DecodeOutcome::Eof,
                }
            }
            SessionState::AwaitHeader => return self.await_header(),
            SessionState::DecodeStart => self.decode_start(),
            SessionState::DecodeBurst => self.decode_burst(),
            SessionState::DecodeAverage => self.decode_average(),
            SessionState::DecodeEnd => self.decode_end(),
            SessionState::SkipUnknown => self.skip_unknown(),
        };

        match result {
            Ok(()) => {
                self.state = SessionState::AwaitHeader;
                DecodeOutcome::Continue(self.position)
            }
            Err(err) => self.fail(err),
        }
    }

    /// Decode until a terminal state and hand over the accumulated records
    pub fn run(mut self) -> SessionRecords {
        loop {
            match self.step() {
                DecodeOutcome::Continue(_) => continue,
                DecodeOutcome::Eof | DecodeOutcome::Error(_) => break,
            }
        }

        debug!(
            "session finished in state {:?} at offset {}: {} bursts, {} averages",
            self.state, self.position, self.burst_count, self.average_count
        );

        SessionRecords {
            dive_start: self.dive_start,
            bursts: self.bursts,
            averages: self.averages,
            diagnostics: self.diagnostics,
            state: self.state,
            error: self.error,
            position: self.position,
        }
    }

    fn await_header(&mut self) -> DecodeOutcome {
        let header_position = self.position + PacketHeader::LEAD_IN;
        if header_position >= self.data.len() {
            debug!("buffer exhausted at offset {}", self.position);
            self.state = SessionState::Eof;
            return DecodeOutcome::Eof;
        }

        let mut cursor = ByteCursor::at(self.data, header_position);
        let header = match PacketHeader::decode(&mut cursor) {
            Ok(header) => header,
            Err(err) => return self.fail(err),
        };
        self.position = cursor.position();
        self.header = Some(header);

        self.state = match header.packet_type() {
            Some(PacketType::Start) => SessionState::DecodeStart,
            Some(PacketType::Burst) => SessionState::DecodeBurst,
            Some(PacketType::Average) => SessionState::DecodeAverage,
            Some(PacketType::End) => SessionState::DecodeEnd,
            Some(PacketType::Mission) | None => SessionState::SkipUnknown,
            Some(PacketType::Eof) => {
                debug!("EOF marker at offset {}", header.offset);
                self.state = SessionState::Eof;
                return DecodeOutcome::Eof;
            }
        };

        DecodeOutcome::Continue(self.position)
    }

    fn decode_start(&mut self) -> Result<()> {
        let mut cursor = ByteCursor::at(self.data, self.position);
        let start = DiveStart::decode(&mut cursor)?;
        self.position = cursor.position();

        if let Some(first) = &self.dive_start {
            warn!(
                "ignoring start of dive {} at offset {}, dive {} already started",
                start.dive_number(),
                start.offset,
                first.dive_number()
            );
            self.diagnostics.push(Diagnostic {
                offset: start.offset,
                kind: DiagnosticKind::RepeatedDiveStart {
                    dive_number: start.dive_number(),
                },
            });
            return Ok(());
        }

        debug!("dive {} start at offset {}", start.dive_number(), start.offset);
        self.dive_start = Some(start);
        Ok(())
    }

    fn decode_burst(&mut self) -> Result<()> {
        self.require_dive_start(PacketType::Burst)?;

        let mut cursor = ByteCursor::at(self.data, self.position);
        let burst = BurstRecord::decode(&mut cursor)?;
        self.burst_count += 1;
        debug!(
            "burst {} on beam {}: {} pings x {} scans",
            self.burst_count, burst.beam_id, burst.pings_in_burst, burst.scans_per_ping
        );

        self.bursts.push(burst);
        self.position = cursor.position();
        Ok(())
    }

    fn decode_average(&mut self) -> Result<()> {
        self.require_dive_start(PacketType::Average)?;

        let mut cursor = ByteCursor::at(self.data, self.position);
        let avg = AverageRecord::decode(&mut cursor)?;
        self.average_count += 1;
        debug!(
            "average {} on beam {}: {} bins",
            self.average_count, avg.beam_id, avg.bin_count
        );

        self.averages.push(avg);
        self.position = cursor.position();
        Ok(())
    }

    fn decode_end(&mut self) -> Result<()> {
        let offset = self.header.map_or(self.position, |h| h.offset);
        debug!("end of dive packet at offset {}", offset);
        self.diagnostics.push(Diagnostic {
            offset,
            kind: DiagnosticKind::DiveEnd,
        });
        Ok(())
    }

    fn skip_unknown(&mut self) -> Result<()> {
        let Some(header) = self.header else {
            return Ok(());
        };

        let byte_count = usize::try_from(header.body_byte_count).map_err(|_| {
            ZonarError::InvalidPacketLength {
                offset: header.offset,
                length: header.body_byte_count as i64,
            }
        })?;

        let mut cursor = ByteCursor::at(self.data, self.position);
        cursor.skip(byte_count)?;

        match header.packet_type() {
            Some(packet_type) => debug!(
                "skipping reserved {} packet at offset {} ({} bytes)",
                packet_type, header.offset, byte_count
            ),
            None => {
                let event = ZonarError::UnknownPacketType {
                    offset: header.offset,
                    packet_type: header.next_packet_type,
                };
                warn!("{}; skipping {} bytes", event, byte_count);
            }
        }

        self.diagnostics.push(Diagnostic {
            offset: header.offset,
            kind: DiagnosticKind::Skipped {
                packet_type: header.next_packet_type,
                byte_count,
            },
        });
        self.position = cursor.position();
        Ok(())
    }

    fn require_dive_start(&self, packet: PacketType) -> Result<()> {
        if self.dive_start.is_none() {
            return Err(ZonarError::MissingDiveStart {
                offset: self.position,
                packet,
            });
        }
        Ok(())
    }

    fn fail(&mut self, err: ZonarError) -> DecodeOutcome {
        let kind = err.kind();
        let offset = err.offset().unwrap_or(self.position);
        warn!("decoding stopped at offset {}: {}", offset, err);

        self.diagnostics.push(Diagnostic {
            offset,
            kind: DiagnosticKind::Stopped {
                kind,
                message: err.to_string(),
            },
        });
        self.state = SessionState::Error;
        self.error = Some(err);
        DecodeOutcome::Error(kind)
    }
}
