use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::*;
use crate::analysis::band::SearchCurve;
use crate::analysis::estimator::{IafDiagnostics, IafOutcome};
use crate::analysis::spectrum::{FrequencyBand, Spectrum};
use crate::analysis::IafError;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub palette: Vec<RGBColor>,
    /// Caption, axis labels and legend. Needs a system font.
    pub text: bool,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            background: RGBColor(10, 10, 10),
            palette: vec![BLUE, RED, GREEN, CYAN, MAGENTA, YELLOW, WHITE],
            text: true,
        }
    }
}
struct Curve<'a> {
    label: &'static str,
    points: Vec<(f64, f64)>,
    color: &'a RGBColor,
}
/// Draw the curves behind an estimate as a PNG: the analysed spectra, the
/// band-search curve, the alpha band edges and (single recordings) the 1/f fit.
pub fn render_iaf_png(outcome: &IafOutcome, style: PlotStyle) -> Result<Vec<u8>, IafError> {
    if style.palette.is_empty() {
        return Err(IafError::Plot("plot palette is empty".into()));
    }
    let color = |idx: usize| &style.palette[idx % style.palette.len()];
    let (caption, curves) = match &outcome.diagnostics {
        IafDiagnostics::Single {
            spectrum,
            smoothed,
            search_curve,
            pink_fit,
            ..
        } => {
            let mut curves = vec![
                spectrum_curve("PSD", spectrum, color(0)),
                spectrum_curve("smoothed PSD", smoothed, color(1)),
            ];
            if let Some(fit) = pink_fit {
                curves.push(Curve {
                    label: "1/f fit",
                    points: spectrum
                        .frequencies_hz()
                        .iter()
                        .map(|&f| (f, fit.predict(f.ln()).exp()))
                        .collect(),
                    color: color(2),
                });
            }
            curves.extend(search_curve.as_ref().map(|c| search(c, color(3))));
            ("Savitzky-Golay IAF", curves)
        }
        IafDiagnostics::Attenuation {
            first,
            second,
            attenuation,
            search_curve,
            ..
        } => {
            let mut curves = vec![
                spectrum_curve("condition 1", first, color(0)),
                spectrum_curve("condition 2", second, color(1)),
                spectrum_curve("attenuation", attenuation, color(2)),
            ];
            curves.extend(search_curve.as_ref().map(|c| search(c, color(3))));
            ("Attenuation IAF", curves)
        }
    };
    let band = outcome.result.alpha_band;
    let (x_min, x_max) = bounds(curves.iter().flat_map(|c| c.points.iter().map(|p| p.0)));
    let (y_min, y_max) = bounds(curves.iter().flat_map(|c| c.points.iter().map(|p| p.1)));
    let y_range = if (y_max - y_min).abs() <= f64::EPSILON * y_max.abs().max(1.0) {
        (y_min - 1.0)..(y_max + 1.0)
    } else {
        y_min..y_max
    };
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if style.text {
            builder
                .caption(caption, ("sans-serif", 20).into_font().color(&WHITE))
                .set_label_area_size(LabelAreaPosition::Left, 60)
                .set_label_area_size(LabelAreaPosition::Bottom, 40);
        }
        let mut chart = builder.build_cartesian_2d(x_min..x_max, y_range.clone())?;
        {
            let mut mesh = chart.configure_mesh();
            mesh.light_line_style(&WHITE.mix(0.1));
            if style.text {
                mesh.x_desc("Frequency (Hz)")
                    .label_style(("sans-serif", 12).into_font().color(&WHITE));
            } else {
                mesh.x_labels(0).y_labels(0);
            }
            mesh.draw()?;
        }
        for curve in curves {
            let color = *curve.color;
            let series = chart.draw_series(LineSeries::new(curve.points, &color))?;
            if style.text {
                series
                    .label(curve.label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
            }
        }
        let edge_color = WHITE.mix(0.6);
        for edge in band_edges(band) {
            chart.draw_series(LineSeries::new(
                [(edge, y_range.start), (edge, y_range.end)],
                &edge_color,
            ))?;
        }
        if style.text {
            chart
                .configure_series_labels()
                .border_style(&WHITE.mix(0.2))
                .background_style(&style.background)
                .label_font(("sans-serif", 12).into_font().color(&WHITE))
                .draw()?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn spectrum_curve<'a>(label: &'static str, spectrum: &Spectrum, color: &'a RGBColor) -> Curve<'a> {
    Curve {
        label,
        points: spectrum
            .frequencies_hz()
            .iter()
            .copied()
            .zip(spectrum.powers().iter().copied())
            .collect(),
        color,
    }
}
fn search<'a>(curve: &SearchCurve, color: &'a RGBColor) -> Curve<'a> {
    Curve {
        label: "band search",
        points: curve
            .frequencies_hz
            .iter()
            .copied()
            .zip(curve.smoothed.iter().copied())
            .collect(),
        color,
    }
}
fn band_edges(band: FrequencyBand) -> [f64; 2] {
    [band.low, band.high]
}
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, IafError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| IafError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    DynamicImage::ImageRgb8(image).write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
