fn main() {
    enumgram::cli::run();
}
