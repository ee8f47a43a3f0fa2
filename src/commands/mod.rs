pub mod decr;
pub mod del;
pub mod executable;
pub mod exist;
pub mod get;
pub mod incr;
pub mod llen;
pub mod lpop;
pub mod lpush;
pub mod lrange;
pub mod ping;
pub mod rpop;
pub mod rpush;
pub mod set;
pub mod zadd;
pub mod zcard;
pub mod zrange;
pub mod zrank;
pub mod zrem;
pub mod zscore;

use bytes::Bytes;
use std::{str, vec};
use strum_macros::IntoStaticStr;
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

use decr::Decr;
use del::Del;
use exist::Exist;
use get::Get;
use incr::Incr;
use llen::LLen;
use lpop::LPop;
use lpush::LPush;
use lrange::LRange;
use ping::Ping;
use rpop::RPop;
use rpush::RPush;
use set::Set;
use zadd::ZAdd;
use zcard::ZCard;
use zrange::ZRange;
use zrank::ZRank;
use zrem::ZRem;
use zscore::ZScore;

#[derive(Debug, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Command {
    // Strings
    Set(Set),
    Get(Get),
    Del(Del),
    Exist(Exist),
    Incr(Incr),
    Decr(Decr),

    // Lists
    LPush(LPush),
    RPush(RPush),
    LRange(LRange),
    LPop(LPop),
    RPop(RPop),
    LLen(LLen),

    // Sorted sets
    ZAdd(ZAdd),
    ZScore(ZScore),
    ZRank(ZRank),
    ZRem(ZRem),
    ZCard(ZCard),
    ZRange(ZRange),

    Ping(Ping),
}

impl Executable for Command {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        match self {
            Command::Set(cmd) => cmd.exec(store),
            Command::Get(cmd) => cmd.exec(store),
            Command::Del(cmd) => cmd.exec(store),
            Command::Exist(cmd) => cmd.exec(store),
            Command::Incr(cmd) => cmd.exec(store),
            Command::Decr(cmd) => cmd.exec(store),
            Command::LPush(cmd) => cmd.exec(store),
            Command::RPush(cmd) => cmd.exec(store),
            Command::LRange(cmd) => cmd.exec(store),
            Command::LPop(cmd) => cmd.exec(store),
            Command::RPop(cmd) => cmd.exec(store),
            Command::LLen(cmd) => cmd.exec(store),
            Command::ZAdd(cmd) => cmd.exec(store),
            Command::ZScore(cmd) => cmd.exec(store),
            Command::ZRank(cmd) => cmd.exec(store),
            Command::ZRem(cmd) => cmd.exec(store),
            Command::ZCard(cmd) => cmd.exec(store),
            Command::ZRange(cmd) => cmd.exec(store),
            Command::Ping(cmd) => cmd.exec(store),
        }
    }
}

impl TryFrom<Frame> for Command {
    type Error = Error;

    fn try_from(frame: Frame) -> Result<Self, Self::Error> {
        // Clients send commands as RESP arrays.
        let frames = match frame {
            Frame::Array(array) => array,
            frame => {
                return Err(CommandParserError::InvalidFrame {
                    expected: "array".to_string(),
                    actual: frame,
                }
                .into())
            }
        };

        let mut parts = frames.into_iter();
        let name = parse_command_name(&mut parts)?;
        let parser = &mut CommandParser { name, parts };

        // Names are matched exactly as sent.
        let command = match &parser.name[..] {
            "SET" => Set::try_from(&mut *parser).map(Command::Set),
            "GET" => Get::try_from(&mut *parser).map(Command::Get),
            "DEL" => Del::try_from(&mut *parser).map(Command::Del),
            "EXIST" | "EXISTS" => Exist::try_from(&mut *parser).map(Command::Exist),
            "INCR" => Incr::try_from(&mut *parser).map(Command::Incr),
            "DECR" => Decr::try_from(&mut *parser).map(Command::Decr),
            "LPUSH" => LPush::try_from(&mut *parser).map(Command::LPush),
            "RPUSH" => RPush::try_from(&mut *parser).map(Command::RPush),
            "LRANGE" => LRange::try_from(&mut *parser).map(Command::LRange),
            "LPOP" => LPop::try_from(&mut *parser).map(Command::LPop),
            "RPOP" => RPop::try_from(&mut *parser).map(Command::RPop),
            "LLEN" => LLen::try_from(&mut *parser).map(Command::LLen),
            "ZADD" => ZAdd::try_from(&mut *parser).map(Command::ZAdd),
            "ZSCORE" => ZScore::try_from(&mut *parser).map(Command::ZScore),
            "ZRANK" => ZRank::try_from(&mut *parser).map(Command::ZRank),
            "ZREM" => ZRem::try_from(&mut *parser).map(Command::ZRem),
            "ZCARD" => ZCard::try_from(&mut *parser).map(Command::ZCard),
            "ZRANGE" => ZRange::try_from(&mut *parser).map(Command::ZRange),
            "PING" => Ping::try_from(&mut *parser).map(Command::Ping),
            _ => {
                return Err(CommandParserError::UnknownCommand {
                    command: parser.name.clone(),
                }
                .into())
            }
        }?;

        parser.finish()?;
        Ok(command)
    }
}

fn parse_command_name(parts: &mut vec::IntoIter<Frame>) -> Result<String, CommandParserError> {
    match parts.next() {
        Some(Frame::Simple(s)) => Ok(s),
        Some(Frame::Bulk(bytes)) => str::from_utf8(&bytes[..])
            .map(|s| s.to_string())
            .map_err(CommandParserError::InvalidUTF8String),
        Some(frame) => Err(CommandParserError::InvalidFrame {
            expected: "simple or bulk string".to_string(),
            actual: frame,
        }),
        None => Err(CommandParserError::EmptyCommand),
    }
}

/// Cursor over the arguments of a single command.
///
/// Running out of arguments, or leaving some unread, is reported as a wrong number of arguments
/// for the command being parsed.
pub struct CommandParser {
    name: String,
    parts: vec::IntoIter<Frame>,
}

impl CommandParser {
    pub fn remaining(&self) -> usize {
        self.parts.len()
    }

    fn next_frame(&mut self) -> Result<Frame, CommandParserError> {
        self.parts
            .next()
            .ok_or_else(|| CommandParserError::WrongNumberOfArguments {
                command: self.name.clone(),
            })
    }

    pub fn next_string(&mut self) -> Result<String, CommandParserError> {
        match self.next_frame()? {
            // Both `Simple` and `Bulk` representation may be strings. Strings are parsed to UTF-8.
            Frame::Simple(s) => Ok(s),
            Frame::Bulk(bytes) => str::from_utf8(&bytes[..])
                .map(|s| s.to_string())
                .map_err(CommandParserError::InvalidUTF8String),
            frame => Err(CommandParserError::InvalidFrame {
                expected: "simple or bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    pub fn next_bytes(&mut self) -> Result<Bytes, CommandParserError> {
        match self.next_frame()? {
            Frame::Simple(s) => Ok(Bytes::from(s)),
            Frame::Bulk(bytes) => Ok(bytes),
            frame => Err(CommandParserError::InvalidFrame {
                expected: "simple or bulk string".to_string(),
                actual: frame,
            }),
        }
    }

    pub fn next_integer(&mut self) -> Result<i64, CommandParserError> {
        match self.next_frame()? {
            Frame::Integer(i) => Ok(i),
            Frame::Simple(s) => s.parse::<i64>().map_err(|_| self.invalid_argument(s)),
            Frame::Bulk(bytes) => {
                let s = str::from_utf8(&bytes[..]).map_err(CommandParserError::InvalidUTF8String)?;
                s.parse::<i64>()
                    .map_err(|_| self.invalid_argument(s.to_string()))
            }
            frame => Err(CommandParserError::InvalidFrame {
                expected: "integer".to_string(),
                actual: frame,
            }),
        }
    }

    /// Parses a float argument. `inf` and `-inf` are accepted, `nan` is not.
    pub fn next_float(&mut self) -> Result<f64, CommandParserError> {
        let s = match self.next_frame()? {
            Frame::Integer(i) => return Ok(i as f64),
            Frame::Simple(s) => s,
            Frame::Bulk(bytes) => str::from_utf8(&bytes[..])
                .map_err(CommandParserError::InvalidUTF8String)?
                .to_string(),
            frame => {
                return Err(CommandParserError::InvalidFrame {
                    expected: "float".to_string(),
                    actual: frame,
                })
            }
        };

        match s.parse::<f64>() {
            Ok(f) if !f.is_nan() => Ok(f),
            _ => Err(self.invalid_argument(s)),
        }
    }

    pub fn invalid_argument(&self, argument: String) -> CommandParserError {
        CommandParserError::InvalidCommandArgument {
            command: self.name.clone(),
            argument,
        }
    }

    fn finish(&self) -> Result<(), CommandParserError> {
        if self.remaining() > 0 {
            return Err(CommandParserError::WrongNumberOfArguments {
                command: self.name.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum CommandParserError {
    #[error("protocol error; invalid frame, expected {expected}, got {actual}")]
    InvalidFrame { expected: String, actual: Frame },
    #[error("protocol error; empty command")]
    EmptyCommand,
    #[error("protocol error; unknown command {command}")]
    UnknownCommand { command: String },
    #[error("protocol error; wrong number of arguments for {command}")]
    WrongNumberOfArguments { command: String },
    #[error("protocol error; invalid command argument {command} {argument}")]
    InvalidCommandArgument { command: String, argument: String },
    #[error("protocol error; invalid UTF-8 string")]
    InvalidUTF8String(#[from] str::Utf8Error),
}
