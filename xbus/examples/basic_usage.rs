//! Basic usage example for the XBus protocol.
//!
//! This example shows how to:
//! - Compute and verify the checksum trailer
//! - Build and decode frames by hand
//! - Drive a protocol node over the loopback transport
//!
//! Run with: cargo run --example basic_usage --features std

use core::time::Duration;

use xbus::transport::LoopbackTransport;
use xbus::{Checksum, Frame, Message, Protocol};

fn main() {
    println!("=== XBus Basic Usage Example ===\n");

    // Example 1: checksum trailer
    println!("1. Checksum trailer:");
    let header = [0x01, 0x06, 0x01, 0x05, 0x02];
    let trailer = Checksum::compute(&header);
    println!("   Header: {header:02x?}");
    println!("   Trailer: 0x{trailer:02X}");
    let mut full = header.to_vec();
    full.push(trailer);
    println!("   Frame sums to zero: {}\n", Checksum::verify(&full));

    // Example 2: frame construction and decoding
    println!("2. Frame round-trip:");
    let frame = Frame::data_with_id(0x01, 0x02, 42, b"reading").expect("payload fits");
    let raw = frame.encode_to_vec().expect("frame fits");
    println!("   Wire bytes ({}): {:02x?}", raw.len(), &raw[..]);

    let message = Message::decode(&raw).expect("decode failed");
    println!("   Source: 0x{:02X}", message.source);
    println!("   Destination: 0x{:02X}", message.destination);
    println!("   Message id: {:?}", message.message_id());
    println!(
        "   Payload: {:?}\n",
        core::str::from_utf8(message.payload()).unwrap()
    );

    // Example 3: protocol node over loopback
    println!("3. Protocol over loopback:");
    let mut node = Protocol::new(LoopbackTransport::<512>::new(), 0x01);

    node.ping(0x05).expect("ping failed");
    let pong = node.receive(Duration::from_millis(20)).expect("no frame");
    println!("   Ping destination: 0x{:02X}", pong.destination);

    node.send_str(0x05, "ok").expect("send failed");
    let text = node.receive(Duration::from_millis(20)).expect("no frame");
    println!("   Text payload bytes: {:02x?}", text.data());

    println!("\nDone.");
}
