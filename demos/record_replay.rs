//! Record a small scene once per frame, replay it into the CPU rasterizer and report how the
//! op buffer behaves across frames.

use std::f64::consts::TAU;
use std::rc::Rc;

use opcanvas::{
    ArcParams, CanvasRecorder, CpuCanvas, CpuCanvasOpts, FillRule, LineCap, Path2D, Point, Rect,
    Rgba8,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut canvas = CanvasRecorder::new();
    let sky = canvas.create_linear_gradient(Point::ZERO, Point::new(0.0, 64.0));
    canvas.add_color_stop(sky, 0.0, Rgba8::rgb(40, 90, 200))?;
    canvas.add_color_stop(sky, 1.0, Rgba8::rgb(250, 200, 120))?;

    let mut star = Path2D::new();
    star.move_to(Point::new(48.0, 8.0));
    star.line_to(Point::new(56.0, 24.0));
    star.line_to(Point::new(40.0, 14.0));
    star.line_to(Point::new(56.0, 14.0));
    star.line_to(Point::new(40.0, 24.0));
    star.close_path();
    let star = Rc::new(star);

    for frame_index in 0..3u32 {
        let t = f64::from(frame_index);

        canvas.save()?;
        canvas.set_fill_gradient(sky)?;
        canvas.fill_rect(Rect::new(0.0, 0.0, 64.0, 64.0))?;

        canvas.set_fill_color(Rgba8::rgb(255, 240, 160))?;
        canvas.begin_path()?;
        canvas.arc(ArcParams {
            center: Point::new(16.0 + 8.0 * t, 20.0),
            radius: 8.0,
            start_angle: 0.0,
            end_angle: TAU,
            anticlockwise: false,
        })?;
        canvas.fill(FillRule::NonZero)?;

        canvas.set_fill_color(Rgba8::WHITE)?;
        canvas.fill_path(&star, FillRule::EvenOdd)?;

        canvas.set_stroke_color(Rgba8::rgb(30, 60, 30))?;
        canvas.set_line_width(3.0)?;
        canvas.set_line_cap(LineCap::Round)?;
        canvas.set_line_dash(&[6.0, 3.0])?;
        canvas.begin_path()?;
        canvas.move_to(Point::new(0.0, 56.0))?;
        canvas.quadratic_curve_to(Point::new(32.0, 40.0), Point::new(64.0, 56.0))?;
        canvas.stroke()?;
        canvas.fill_text("frame", Point::new(4.0, 60.0), None)?;
        canvas.restore()?;

        let records = canvas.ops().len();
        let bytes = canvas.ops().used_size();
        let fingerprint = canvas.ops().fingerprint();

        let mut cpu = CpuCanvas::new(CpuCanvasOpts::new(64, 64).with_clear_rgba([0, 0, 0, 255]))?;
        canvas.flush(&mut cpu)?;
        let frame = cpu.finish();

        let covered = frame.data.chunks_exact(4).filter(|px| px[3] > 0).count();
        println!(
            "frame {frame_index}: {records} records, {bytes} bytes, fingerprint {fingerprint:016x}, \
             capacity {} after {} grow(s), {covered} opaque pixels",
            canvas.ops().capacity(),
            canvas.ops().grow_events(),
        );
    }
    Ok(())
}
