//! Text contract of the board's four endpoints (`writer`, `reader`, `count`,
//! `dump`). Whatever exposes them (files, a socket, a CLI) only moves bytes;
//! parsing and formatting live here.

use log::debug;

use crate::errors::KboardError;
use crate::Kboard;

/// Longest raw input accepted by the writer endpoint.
pub const WRITER_BUFFER_SIZE: usize = 20;

pub struct TextEndpoints {
    board: Kboard,
}

impl TextEndpoints {
    pub fn new(board: Kboard) -> TextEndpoints {
        TextEndpoints { board }
    }

    /// Writer endpoint, write side: copies the integer in `data`.
    /// Returns the number of bytes consumed.
    pub fn write(&self, data: &[u8]) -> Result<usize, KboardError> {
        if data.len() > WRITER_BUFFER_SIZE {
            debug!(
                "Data length is too long, length: '{}', max: '{}'",
                data.len(),
                WRITER_BUFFER_SIZE
            );
            return Err(KboardError::ArgumentTooLong {
                length: data.len(),
                max: WRITER_BUFFER_SIZE,
            });
        }
        let item = parse_item(data)?;
        self.board.enqueue(item)?;
        Ok(data.len())
    }

    /// Writer endpoint, read side: pastes the oldest clip.
    pub fn writer_show(&self) -> Result<String, KboardError> {
        let item = self.board.dequeue()?;
        Ok(format!("Paste: '{}'\n", item))
    }

    pub fn reader_show(&self) -> String {
        format!("{}\n", self.board.peek_random())
    }

    pub fn counter_show(&self) -> String {
        format!("Kboard Count: '{}'\n", self.board.count())
    }

    pub fn dump_show(&self) -> String {
        self.board.dump().to_string()
    }
}

// Leading integer, `%d` style: optional whitespace and sign, then digits; the rest is ignored.
fn parse_item(data: &[u8]) -> Result<i32, KboardError> {
    let malformed = || KboardError::Malformed(String::from_utf8_lossy(data).into_owned());

    let text = std::str::from_utf8(data).map_err(|_| malformed())?;
    let text = text.trim_start();
    let sign_len = if text.starts_with('-') || text.starts_with('+') { 1 } else { 0 };
    let digits = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        debug!("Invalid argument, must input 1 integer");
        return Err(malformed());
    }
    text[..sign_len + digits].parse::<i32>().map_err(|_| malformed())
}
