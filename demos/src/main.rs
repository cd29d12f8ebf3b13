fn main() -> anyhow::Result<()> {
    orrery_demos::main()
}
