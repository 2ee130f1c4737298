use pencmd::{Executor, Recorder};

fn main() {
    let script = "r = 10\nwhile r < 40\ncircle r\nr = r + 10\nendwhile\npen red\ndrawto 100, 50\n";
    let mut ex = Executor::new(Recorder::new());
    let batch = ex.run(&pencmd::normalize(script)).unwrap();
    assert!(batch.is_valid());
    dbg!(ex.into_canvas().ops);
}
