use sigmoid_mlp::{train_network, Network, TrainingExample};

fn main() -> sigmoid_mlp::Result<()> {
    env_logger::init();

    let mut network = Network::new(&[2, 3, 1], 0.5)?;

    let set = vec![
        TrainingExample::new(vec![1.0, 0.0], vec![1.0]),
        TrainingExample::new(vec![1.0, 1.0], vec![0.0]),
        TrainingExample::new(vec![0.0, 1.0], vec![1.0]),
        TrainingExample::new(vec![0.0, 0.0], vec![0.0]),
    ];

    let epochs = 20000;

    for epoch in 0..epochs {
        let error = train_network(&mut network, &set)?;
        if epoch % 2000 == 0 {
            println!("Epoch {epoch}: mean error = {error:.6}");
        }
    }

    for example in &set {
        let output = network.forward(&example.inputs)?.output_values();
        println!("Input: {:?} -> Output: {:.4}", example.inputs, output[0]);
    }

    Ok(())
}
