use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{self, UnboundedSender};

use quickdis::codec::FrameCodec;
use quickdis::connection::Connection;
use quickdis::frame::Frame;

async fn create_tcp_connection() -> Result<(UnboundedSender<Vec<u8>>, TcpStream), std::io::Error> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let local_addr = listener.local_addr()?;

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            while let Some(data) = rx.recv().await {
                // Write the received channel data to the socket.
                if socket.write_all(&data).await.is_err() {
                    break;
                }
            }
        }
    });

    // Connect to the server as a client to complete the setup.
    let stream = TcpStream::connect(local_addr).await?;

    Ok((tx, stream))
}

#[tokio::test]
async fn test_parse_single_string() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    tcp_stream_tx.send(b"+OK\r\n".to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Simple("OK".to_string()));

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_parse_bulk_string_with_crlf_inside() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    // The declared length wins over any line break in the payload.
    tcp_stream_tx.send(b"$7\r\nhel\r\nlo\r\n".to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Bulk(Bytes::from("hel\r\nlo")));

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_parse_array() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    let bytes = b"*4\r\n$4\r\nZADD\r\n$1\r\nz\r\n$1\r\na\r\n$3\r\n1.5\r\n";

    tcp_stream_tx.send(bytes.to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Array(vec![
        Frame::Bulk(Bytes::from("ZADD")),
        Frame::Bulk(Bytes::from("z")),
        Frame::Bulk(Bytes::from("a")),
        Frame::Bulk(Bytes::from("1.5")),
    ]));

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_parse_null_bulk_string() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    tcp_stream_tx.send(b"$-1\r\n".to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();

    assert_eq!(actual, Some(Frame::Null));
}

#[tokio::test]
async fn test_parse_multiple_frames_sequentially() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    tcp_stream_tx.send(b"+OK\r\n".to_vec()).unwrap();
    tcp_stream_tx
        .send(b"*2\r\n$4\r\nLLEN\r\n$4\r\nlist\r\n".to_vec())
        .unwrap();
    tcp_stream_tx.send(b"-ERR no such key\r\n".to_vec()).unwrap();
    tcp_stream_tx.send(b":1000\r\n".to_vec()).unwrap();

    let actual = connection.read_frame().await.unwrap();
    assert_eq!(actual, Some(Frame::Simple("OK".to_string())));

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Array(vec![
        Frame::Bulk(Bytes::from("LLEN")),
        Frame::Bulk(Bytes::from("list")),
    ]));
    assert_eq!(actual, expected);

    let actual = connection.read_frame().await.unwrap();
    assert_eq!(actual, Some(Frame::Error("ERR no such key".to_string())));

    let actual = connection.read_frame().await.unwrap();
    assert_eq!(actual, Some(Frame::Integer(1000)));
}

#[tokio::test]
async fn test_parse_incomplete_frame() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    // Command split into three parts to simulate partial data arriving.
    let part1 = b"*3\r\n$3\r\nSE";
    let part2 = b"T\r\n$5\r\nmyke";
    let part3 = b"y\r\n$7\r\nmyvalue\r\n";

    tokio::spawn(async move {
        for part in [part1.to_vec(), part2.to_vec(), part3.to_vec()] {
            tcp_stream_tx.send(part).unwrap();
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        }
    });

    let actual = connection.read_frame().await.unwrap();
    let expected = Some(Frame::Array(vec![
        Frame::Bulk(Bytes::from("SET")),
        Frame::Bulk(Bytes::from("mykey")),
        Frame::Bulk(Bytes::from("myvalue")),
    ]));
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_peer_closed() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    drop(tcp_stream_tx);

    assert_eq!(connection.read_frame().await.unwrap(), None);
}

#[tokio::test]
async fn test_invalid_data_type() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::new(tcp_stream);

    tcp_stream_tx.send(b"?what\r\n".to_vec()).unwrap();

    assert!(connection.read_frame().await.is_err());
}

#[tokio::test]
async fn test_frame_size_limit() {
    let (tcp_stream_tx, tcp_stream) = create_tcp_connection().await.unwrap();
    let mut connection = Connection::with_codec(tcp_stream, FrameCodec::new(16));

    tcp_stream_tx
        .send(b"$32\r\naaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n".to_vec())
        .unwrap();

    assert!(connection.read_frame().await.is_err());
}

#[tokio::test]
async fn test_write_frame() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let local_addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut connection = Connection::new(socket);
        connection.read_frame().await.unwrap()
    });

    let mut client = Connection::new(TcpStream::connect(local_addr).await.unwrap());
    let frame = Frame::Array(vec![
        Frame::Bulk(Bytes::from("GET")),
        Frame::Bulk(Bytes::from("key")),
    ]);
    client.write_frame(frame.clone()).await.unwrap();

    assert_eq!(server.await.unwrap(), Some(frame));
}

#[tokio::test]
async fn test_connections_get_distinct_ids() {
    let (_tx_a, stream_a) = create_tcp_connection().await.unwrap();
    let (_tx_b, stream_b) = create_tcp_connection().await.unwrap();

    let a = Connection::new(stream_a);
    let b = Connection::new(stream_b);

    assert_ne!(a.id, b.id);
}
