fn main() {
    std::process::exit(carepulse_lib::run());
}
