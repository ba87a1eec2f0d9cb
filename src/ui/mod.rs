pub mod progress;
pub mod prompt;

pub fn print_banner() {
    println!("satlink-rs :: satellite transmitter channel simulator");
}
