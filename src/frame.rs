// https://redis.io/docs/reference/protocol-spec

use std::fmt;

use bytes::Buf;
use bytes::Bytes;
use std::io::Cursor;
use std::string::FromUtf8Error;
use thiserror::Error as ThisError;

static CRLF: &[u8; 2] = b"\r\n";

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("not enough data is available to parse an entire frame")]
    Incomplete,
    #[error("invalid frame data type: {0}")]
    InvalidDataType(u8),
    #[error("unsupported frame data type: {0:?}")]
    UnsupportedDataType(char),
    #[error("protocol error; {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Null,
    Array(Vec<Frame>),
}

impl Frame {
    /// The status reply sent by every command that succeeds without a payload.
    pub fn ok() -> Frame {
        Frame::Simple("OK".to_string())
    }

    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Self, Error> {
        // The first byte always identifies the type, the rest is its contents.
        let first_byte = get_byte(src)?;
        let data_type = DataType::try_from(first_byte)?;

        match data_type {
            DataType::SimpleString => {
                let line = get_line(src)?.to_vec();
                Ok(Frame::Simple(String::from_utf8(line)?))
            }
            DataType::SimpleError => {
                let line = get_line(src)?.to_vec();
                Ok(Frame::Error(String::from_utf8(line)?))
            }
            DataType::Integer => Ok(Frame::Integer(get_decimal(src)?)),
            // $<length>\r\n<data>\r\n
            DataType::BulkString => {
                let length = get_decimal(src)?;
                if length == -1 {
                    return Ok(Frame::Null);
                }
                let data = get_exact(src, to_length(length)?)?;
                Ok(Frame::Bulk(Bytes::copy_from_slice(data)))
            }
            // *<number-of-elements>\r\n<element-1>...<element-n>
            DataType::Array => {
                let length = get_decimal(src)?;
                if length == -1 {
                    return Ok(Frame::Null);
                }

                let length = to_length(length)?;
                // Every element needs at least three bytes, so a bogus length cannot
                // make us preallocate more than the buffer could ever hold.
                let mut frames = Vec::with_capacity(length.min(src.remaining() / 3));
                for _ in 0..length {
                    frames.push(Self::parse(src)?);
                }

                Ok(Frame::Array(frames))
            }
            DataType::Null => {
                get_line(src)?;
                Ok(Frame::Null)
            }
            other => Err(Error::UnsupportedDataType(char::from(u8::from(other)))),
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes);
        bytes
    }

    fn write_to(&self, dst: &mut Vec<u8>) {
        match self {
            Frame::Simple(s) => {
                dst.push(u8::from(DataType::SimpleString));
                dst.extend_from_slice(s.as_bytes());
                dst.extend_from_slice(CRLF);
            }
            Frame::Error(s) => {
                dst.push(u8::from(DataType::SimpleError));
                dst.extend_from_slice(s.as_bytes());
                dst.extend_from_slice(CRLF);
            }
            Frame::Integer(i) => {
                dst.push(u8::from(DataType::Integer));
                dst.extend_from_slice(i.to_string().as_bytes());
                dst.extend_from_slice(CRLF);
            }
            Frame::Bulk(data) => {
                dst.push(u8::from(DataType::BulkString));
                dst.extend_from_slice(data.len().to_string().as_bytes());
                dst.extend_from_slice(CRLF);
                dst.extend_from_slice(data);
                dst.extend_from_slice(CRLF);
            }
            // RESP2 null bulk string, understood by every client.
            Frame::Null => dst.extend_from_slice(b"$-1\r\n"),
            Frame::Array(frames) => {
                dst.push(u8::from(DataType::Array));
                dst.extend_from_slice(frames.len().to_string().as_bytes());
                dst.extend_from_slice(CRLF);
                for frame in frames {
                    frame.write_to(dst);
                }
            }
        }
    }
}

impl From<Frame> for Vec<u8> {
    fn from(frame: Frame) -> Self {
        frame.serialize()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "+{}", s),
            Frame::Error(s) => write!(f, "-{}", s),
            Frame::Integer(i) => write!(f, ":{}", i),
            Frame::Bulk(bytes) => write!(f, "${}", String::from_utf8_lossy(bytes)),
            Frame::Null => write!(f, "$-1"),
            Frame::Array(arr) => {
                write!(f, "[")?;
                for (i, frame) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", frame)?;
                }
                write!(f, "]")
            }
        }
    }
}

fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let buf: &'a [u8] = *src.get_ref();

    let end = buf[start..]
        .windows(2)
        .position(|window| window == CRLF)
        .map(|index| start + index)
        .ok_or(Error::Incomplete)?;

    src.set_position((end + CRLF.len()) as u64);

    Ok(&buf[start..end])
}

fn get_exact<'a>(src: &mut Cursor<&'a [u8]>, length: usize) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let buf: &'a [u8] = *src.get_ref();

    if buf.len() < start + length + CRLF.len() {
        return Err(Error::Incomplete);
    }
    if &buf[start + length..start + length + CRLF.len()] != CRLF {
        return Err(Error::Invalid("bulk length does not match data".to_string()));
    }

    src.set_position((start + length + CRLF.len()) as u64);

    Ok(&buf[start..start + length])
}

fn get_decimal(src: &mut Cursor<&[u8]>) -> Result<i64, Error> {
    let line = get_line(src)?;
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| Error::Invalid("invalid integer".to_string()))
}

fn to_length(length: i64) -> Result<usize, Error> {
    usize::try_from(length).map_err(|_| Error::Invalid(format!("invalid length {}", length)))
}

fn get_byte(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }
    Ok(src.get_u8())
}

#[derive(Debug)]
enum DataType {
    SimpleString,   // '+'
    BulkString,     // '$'
    VerbatimString, // '='
    SimpleError,    // '-'
    BulkError,      // '!'
    Boolean,        // '#'
    Integer,        // ':'
    Double,         // ','
    BigNumber,      // '('
    Array,          // '*'
    Map,            // '%'
    Set,            // '~'
    Push,           // '>'
    Null,           // '_'
}

impl TryFrom<u8> for DataType {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            b'+' => Ok(Self::SimpleString),
            b'-' => Ok(Self::SimpleError),
            b':' => Ok(Self::Integer),
            b'$' => Ok(Self::BulkString),
            b'!' => Ok(Self::BulkError),
            b'*' => Ok(Self::Array),
            b'_' => Ok(Self::Null),
            b'#' => Ok(Self::Boolean),
            b',' => Ok(Self::Double),
            b'(' => Ok(Self::BigNumber),
            b'=' => Ok(Self::VerbatimString),
            b'%' => Ok(Self::Map),
            b'~' => Ok(Self::Set),
            b'>' => Ok(Self::Push),
            _ => Err(Error::InvalidDataType(byte)),
        }
    }
}

impl From<DataType> for u8 {
    fn from(value: DataType) -> Self {
        match value {
            DataType::SimpleString => b'+',
            DataType::SimpleError => b'-',
            DataType::Integer => b':',
            DataType::BulkString => b'$',
            DataType::BulkError => b'!',
            DataType::Array => b'*',
            DataType::Null => b'_',
            DataType::Boolean => b'#',
            DataType::Double => b',',
            DataType::BigNumber => b'(',
            DataType::VerbatimString => b'=',
            DataType::Map => b'%',
            DataType::Set => b'~',
            DataType::Push => b'>',
        }
    }
}

impl From<FromUtf8Error> for Error {
    fn from(_src: FromUtf8Error) -> Error {
        Error::Invalid("invalid frame format".to_string())
    }
}
