use rosc::{OscMessage, OscPacket, OscType};

// Single positional float argument; the receiving console reads it as level or trigger
pub fn create_value_message(address: &str, value: f32) -> OscPacket {
    OscPacket::Message(OscMessage {
        addr: address.to_string(),
        args: vec![OscType::Float(value)],
    })
}
