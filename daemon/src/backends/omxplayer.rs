//! `omxplayer`, the Raspberry Pi hardware-accelerated player.

use crate::backends::Backend;

pub struct Omxplayer {
    extra_args: Vec<String>,
}

impl Omxplayer {
    pub fn new(extra_args: Vec<String>) -> Self {
        Self { extra_args }
    }
}

impl Backend for Omxplayer {
    fn get_name() -> &'static str {
        "omxplayer"
    }

    /// The volume hint is in millibels.
    fn get_args(&self, item: &str, looping: bool, volume: i32) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "hdmi".to_string(),
            "--vol".to_string(),
            volume.to_string(),
        ];
        if looping {
            args.push("--loop".to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args.push(item.to_string());
        args
    }
}
