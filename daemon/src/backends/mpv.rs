//! `mpv`, for boards without `omxplayer`.

use crate::backends::Backend;

pub struct Mpv {
    extra_args: Vec<String>,
}

impl Mpv {
    pub fn new(extra_args: Vec<String>) -> Self {
        Self { extra_args }
    }
}

impl Backend for Mpv {
    fn get_name() -> &'static str {
        "mpv"
    }

    /// The volume hint is a percentage, zero means no hint.
    fn get_args(&self, item: &str, looping: bool, volume: i32) -> Vec<String> {
        let mut args = vec!["--fs".to_string()];
        if volume != 0 {
            args.push(format!("--volume={volume}"));
        }
        if looping {
            args.push("--loop=inf".to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args.push(item.to_string());
        args
    }
}
