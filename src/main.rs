fn main() {
    stencil::cli::run();
}
