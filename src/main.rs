use color_eyre::Result;

fn main() -> Result<()> {
    scribe::run()
}
