use log::{info, warn};
use std::os::unix::net::UnixListener;
use std::time::Duration;
use xbus::transport::UnixTransport;
use xbus::{Error, Protocol};

const SOCKET_PATH: &str = "/tmp/xbus.sock";
const DEVICE_ADDR: u8 = 0x1F;
const READ_TIMEOUT: Duration = Duration::from_millis(500);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| SOCKET_PATH.to_string());

    // Remove socket file if it exists
    let _ = std::fs::remove_file(&path);
    let listener = UnixListener::bind(&path).expect("Failed to bind to socket");
    info!("Device 0x{DEVICE_ADDR:02X} listening on {path}");

    let (stream, _) = listener.accept().expect("Failed to accept connection");
    info!("Master connected");

    let mut node = Protocol::new(UnixTransport::new(stream), DEVICE_ADDR);

    // A disconnected peer reads as an endless stream of empty reads, so give
    // up after a quiet period instead of spinning.
    let mut idle = 0u32;

    loop {
        let message = match node.receive(READ_TIMEOUT) {
            Ok(message) => {
                idle = 0;
                message
            }
            Err(Error::Timeout) => {
                idle += 1;
                if idle >= 20 {
                    info!("No traffic for {} reads, shutting down", idle);
                    break;
                }
                continue;
            }
            Err(Error::Io) => {
                info!("Bus closed, shutting down");
                break;
            }
            Err(e) => {
                warn!("Dropping frame: {e}");
                continue;
            }
        };

        if message.destination != DEVICE_ADDR {
            // Half-duplex bus: frames for other devices are visible too.
            continue;
        }

        if message.data().is_empty() {
            info!("Ping from 0x{:02X}", message.source);
            node.send(message.source, &[]).expect("Failed to answer ping");
            continue;
        }

        info!(
            "Message from 0x{:02X}: id={:?}, {} payload bytes",
            message.source,
            message.message_id(),
            message.payload().len()
        );

        // Echo the payload region back verbatim, identifier included.
        node.send(message.source, message.data())
            .expect("Failed to send echo");
    }
}
