use raster_image::{Color, DefaultCodec, Error, Image, ImageCodec};

fn checkerboard() -> Image {
    let mut image = Image::filled(5, 3, Color::NONE);
    for y in 0..3 {
        for x in 0..5 {
            let color = if (x + y) % 2 == 0 {
                Color::from_rgba8(200, 10, 30, 255)
            } else {
                Color::from_rgba8(0, 90, 250, 120)
            };
            image.set_pixel(x, y, color);
        }
    }
    image
}

#[test]
fn png_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.png");

    let image = checkerboard();
    image.save(&path).unwrap();
    let loaded = Image::load(&path).unwrap();
    assert_eq!(loaded, image);
}

#[test]
fn tga_and_bmp_keep_size() {
    let dir = tempfile::tempdir().unwrap();
    let image = checkerboard();
    for name in ["board.tga", "board.bmp"] {
        let path = dir.path().join(name);
        image.save(&path).unwrap();
        let loaded = Image::load(&path).unwrap();
        assert_eq!(loaded.resolution(), image.resolution(), "{name}");
    }
}

#[test]
fn jpeg_drops_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.jpg");

    let codec = DefaultCodec::new().with_jpeg_quality(100);
    checkerboard().save_to_file(&codec, &path).unwrap();

    let mut loaded = Image::empty();
    loaded.load_from_file(&codec, &path).unwrap();
    assert_eq!((loaded.width(), loaded.height()), (5, 3));
    assert!(loaded
        .pixels()
        .unwrap()
        .chunks_exact(4)
        .all(|pix| pix[3] == 255));
}

#[test]
fn load_from_memory_and_stream() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.png");
    checkerboard().save(&path).unwrap();
    let data = std::fs::read(&path).unwrap();

    let codec = DefaultCodec::new();
    let mut from_memory = Image::empty();
    from_memory.load_from_memory(&codec, &data).unwrap();
    assert_eq!(from_memory, checkerboard());

    let mut from_stream = Image::empty();
    from_stream
        .load_from_stream(&codec, std::fs::File::open(&path).unwrap())
        .unwrap();
    assert_eq!(from_stream, checkerboard());

    let decoded = codec.decode(&data).unwrap();
    assert_eq!((decoded.width, decoded.height), (5, 3));
    assert_eq!(decoded.pixels, checkerboard().pixels().unwrap());
}

#[test]
fn save_errors() {
    let dir = tempfile::tempdir().unwrap();

    let err = checkerboard().save(dir.path().join("board.xyz")).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)), "{err}");

    let err = Image::empty().save(dir.path().join("empty.png")).unwrap_err();
    assert!(matches!(err, Error::EmptyImage), "{err}");
    assert!(!dir.path().join("empty.png").exists());
}

#[test]
fn load_errors() {
    let dir = tempfile::tempdir().unwrap();

    let err = Image::load(dir.path().join("missing.png")).unwrap_err();
    assert!(matches!(err, Error::Io(_)), "{err}");

    let path = dir.path().join("garbage.png");
    std::fs::write(&path, b"not a png").unwrap();
    let mut image = checkerboard();
    let err = image.load_from_file(&DefaultCodec::new(), &path).unwrap_err();
    assert!(matches!(err, Error::Image(_)), "{err}");
    assert_eq!(image, checkerboard());
}
