use crop_ml::CropMl;

fn main() -> iced::Result {
    // RUST_LOG overrides the default filter
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application("Crop ML", CropMl::update, CropMl::view)
        .theme(CropMl::theme)
        .centered()
        .run_with(CropMl::new)
}
