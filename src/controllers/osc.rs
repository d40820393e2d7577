// src/controllers/osc.rs
//
// The remote parameter surface. Incoming OSC messages are translated into
// typed commands and queued; the app drains the queue once per update, so
// every change lands between frames, never inside one.

use nannou_osc as osc;
use std::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum ParamCommand {
    SetText { text: String },
    SetMode { name: String },
    SetSeed { seed: f32 },
    /// Raw slider value; the app applies the quadratic speed mapping.
    SetSpeed { raw: f32 },
    SetPhase { phase: f32 },
    SetDepth { depth: f32 },
    SetRotSpeed { value: f32 },
    SetPosterize { steps: f32 },
    SetAccent { r: f32, g: f32, b: f32 },
    SetColorEnabled { on: bool },
    SetSpeedEnabled { on: bool },
    SetRotationEnabled { on: bool },
    SetWanderEnabled { on: bool },
    ResetCamera,
}

pub struct OscController {
    command_queue: Vec<ParamCommand>,
    receiver: osc::Receiver,
}

impl OscController {
    pub fn new(port: u16) -> Result<Self, Box<dyn Error>> {
        let receiver = osc::receiver(port)?;

        Ok(Self {
            command_queue: Vec::new(),
            receiver,
        })
    }

    pub fn process_messages(&mut self) {
        for (packet, _addr) in self.receiver.try_iter() {
            for message in packet.into_msgs() {
                if let Some(command) = translate(&message) {
                    self.command_queue.push(command);
                }
            }
        }
    }

    pub fn take_commands(&mut self) -> Vec<ParamCommand> {
        std::mem::take(&mut self.command_queue)
    }
}

fn translate(message: &osc::Message) -> Option<ParamCommand> {
    let args = message.args.as_slice();
    match message.addr.as_str() {
        "/scene/text" => {
            if let [osc::Type::String(text)] = args {
                return Some(ParamCommand::SetText { text: text.clone() });
            }
        }
        "/scene/mode" => {
            if let [osc::Type::String(name)] = args {
                return Some(ParamCommand::SetMode { name: name.clone() });
            }
        }
        "/scene/seed" => {
            if let [osc::Type::Float(seed)] = args {
                return Some(ParamCommand::SetSeed { seed: *seed });
            }
        }
        "/scene/speed" => {
            if let [osc::Type::Float(raw)] = args {
                return Some(ParamCommand::SetSpeed { raw: *raw });
            }
        }
        "/scene/phase" => {
            if let [osc::Type::Float(phase)] = args {
                return Some(ParamCommand::SetPhase { phase: *phase });
            }
        }
        "/scene/depth" => {
            if let [osc::Type::Float(depth)] = args {
                return Some(ParamCommand::SetDepth { depth: *depth });
            }
        }
        "/scene/rotspeed" => {
            if let [osc::Type::Float(value)] = args {
                return Some(ParamCommand::SetRotSpeed { value: *value });
            }
        }
        "/scene/posterize" => {
            if let [osc::Type::Float(steps)] = args {
                return Some(ParamCommand::SetPosterize { steps: *steps });
            }
        }
        "/scene/accent" => {
            if let [osc::Type::Float(r), osc::Type::Float(g), osc::Type::Float(b)] = args {
                return Some(ParamCommand::SetAccent {
                    r: *r,
                    g: *g,
                    b: *b,
                });
            }
        }
        "/scene/color_enabled" => {
            if let [osc::Type::Int(on)] = args {
                return Some(ParamCommand::SetColorEnabled { on: *on != 0 });
            }
        }
        "/scene/speed_enabled" => {
            if let [osc::Type::Int(on)] = args {
                return Some(ParamCommand::SetSpeedEnabled { on: *on != 0 });
            }
        }
        "/scene/rotation_enabled" => {
            if let [osc::Type::Int(on)] = args {
                return Some(ParamCommand::SetRotationEnabled { on: *on != 0 });
            }
        }
        "/scene/wander_enabled" => {
            if let [osc::Type::Int(on)] = args {
                return Some(ParamCommand::SetWanderEnabled { on: *on != 0 });
            }
        }
        "/camera/reset" => return Some(ParamCommand::ResetCamera),
        _ => (),
    }
    None
}
