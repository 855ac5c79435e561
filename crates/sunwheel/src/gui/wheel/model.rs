use gdk_pixbuf::prelude::*;
use gdk_pixbuf::{Pixbuf, PixbufError, PixbufLoader};
use sunburst::{Dataset, SvgScene, Wheel, WheelConfig, build_wheel};

/// What the drawing area paints: the rasterised wheel and its current rotation.
#[derive(Default)]
pub struct WheelView {
    pub dataset: Option<Dataset>,
    pub pixbuf: Option<Pixbuf>,
    /// Degrees, clockwise on screen.
    pub rotation: f64,
}

impl WheelView {
    pub fn set_dataset(
        &mut self,
        dataset: Dataset,
        config: &WheelConfig,
    ) -> Result<Option<Wheel>, glib::Error> {
        self.dataset = Some(dataset);
        self.rebuild(config)
    }

    /// Re-runs layout for the held dataset. Rotation is kept.
    pub fn rebuild(&mut self, config: &WheelConfig) -> Result<Option<Wheel>, glib::Error> {
        let Some(dataset) = &self.dataset else {
            return Ok(None);
        };
        let (wheel, svg) = render_svg(dataset, config);
        self.pixbuf = Some(rasterize(&svg)?);
        Ok(Some(wheel))
    }
}

pub fn render_svg(dataset: &Dataset, config: &WheelConfig) -> (Wheel, String) {
    let mut scene = SvgScene::new(config.outer_radius);
    let wheel = build_wheel(dataset, config, &mut scene);
    (wheel, scene.to_svg())
}

fn rasterize(svg: &str) -> Result<Pixbuf, glib::Error> {
    let loader = PixbufLoader::with_mime_type("image/svg+xml")?;
    loader.write(svg.as_bytes())?;
    loader.close()?;
    loader
        .pixbuf()
        .ok_or_else(|| glib::Error::new(PixbufError::Failed, "SVG loader produced no image"))
}
